diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        full_name -> Text,
        role -> Text,               // operator | mechanic | supervisor
        created_at -> Timestamp,
    }
}

diesel::table! {
    forklifts (id) {
        id -> Integer,
        unit_number -> Text,
        brand -> Text,
        model -> Text,
        year -> Integer,
        serial_number -> Text,
        status -> Text,             // active | maintenance | inactive
        created_at -> Timestamp,
    }
}

diesel::table! {
    checklist_items (id) {
        id -> Integer,
        category -> Text,
        item_name -> Text,
        description -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    daily_inspections (id) {
        id -> Integer,
        forklift_id -> Integer,     // FK to forklifts.id
        operator_id -> Integer,     // FK to users.id
        inspection_date -> Timestamp,
        shift -> Text,              // morning | afternoon | night
        hours_meter -> Nullable<Double>,
        fuel_level -> Nullable<Integer>,
        overall_status -> Text,     // pass | fail | needs_attention
        notes -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    inspection_results (id) {
        id -> Integer,
        inspection_id -> Integer,   // FK to daily_inspections.id
        checklist_item_id -> Integer,
        status -> Text,             // ok | defect | not_applicable
        notes -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::joinable!(daily_inspections -> forklifts (forklift_id));
diesel::joinable!(daily_inspections -> users (operator_id));
diesel::joinable!(inspection_results -> daily_inspections (inspection_id));
diesel::joinable!(inspection_results -> checklist_items (checklist_item_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    forklifts,
    checklist_items,
    daily_inspections,
    inspection_results,
);
