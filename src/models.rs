use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{checklist_items, daily_inspections, forklifts, inspection_results, users};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Operator,
    Mechanic,
    Supervisor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Operator => "operator",
            UserRole::Mechanic => "mechanic",
            UserRole::Supervisor => "supervisor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForkliftStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl ForkliftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForkliftStatus::Active => "active",
            ForkliftStatus::Maintenance => "maintenance",
            ForkliftStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ForkliftStatus::Active),
            "maintenance" => Some(ForkliftStatus::Maintenance),
            "inactive" => Some(ForkliftStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Afternoon => "afternoon",
            Shift::Night => "night",
        }
    }
}

/// Inspection-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pass,
    Fail,
    NeedsAttention,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pass => "pass",
            InspectionStatus::Fail => "fail",
            InspectionStatus::NeedsAttention => "needs_attention",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(InspectionStatus::Pass),
            "fail" => Some(InspectionStatus::Fail),
            "needs_attention" => Some(InspectionStatus::NeedsAttention),
            _ => None,
        }
    }
}

/// Per-item verdict within an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    Ok,
    Defect,
    NotApplicable,
}

impl ChecklistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistStatus::Ok => "ok",
            ChecklistStatus::Defect => "defect",
            ChecklistStatus::NotApplicable => "not_applicable",
        }
    }
}

/// The recorder's verdict rule: any defect fails the inspection, anything
/// else passes. `needs_attention` is a valid stored status but is never
/// produced here.
pub fn derive_overall_status(outcomes: &[ChecklistStatus]) -> InspectionStatus {
    if outcomes.iter().any(|s| *s == ChecklistStatus::Defect) {
        InspectionStatus::Fail
    } else {
        InspectionStatus::Pass
    }
}

#[derive(Queryable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = forklifts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Forklift {
    pub id: i32,
    pub unit_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub serial_number: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = forklifts)]
pub struct NewForklift {
    pub unit_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub serial_number: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = checklist_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChecklistItem {
    pub id: i32,
    pub category: String,
    pub item_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = checklist_items)]
pub struct NewChecklistItem {
    pub category: String,
    pub item_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = daily_inspections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyInspection {
    pub id: i32,
    pub forklift_id: i32,
    pub operator_id: i32,
    pub inspection_date: NaiveDateTime,
    pub shift: String,
    pub hours_meter: Option<f64>,
    pub fuel_level: Option<i32>,
    pub overall_status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = daily_inspections)]
pub struct NewDailyInspection {
    pub forklift_id: i32,
    pub operator_id: i32,
    pub inspection_date: NaiveDateTime,
    pub shift: String,
    pub hours_meter: Option<f64>,
    pub fuel_level: Option<i32>,
    pub overall_status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = inspection_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InspectionResult {
    pub id: i32,
    pub inspection_id: i32,
    pub checklist_item_id: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = inspection_results)]
pub struct NewInspectionResult {
    pub inspection_id: i32,
    pub checklist_item_id: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_defect_fails() {
        let outcomes = [
            ChecklistStatus::Ok,
            ChecklistStatus::Defect,
            ChecklistStatus::Ok,
        ];
        assert_eq!(derive_overall_status(&outcomes), InspectionStatus::Fail);
    }

    #[test]
    fn all_ok_passes() {
        let outcomes = [ChecklistStatus::Ok, ChecklistStatus::Ok];
        assert_eq!(derive_overall_status(&outcomes), InspectionStatus::Pass);
    }

    #[test]
    fn not_applicable_only_still_passes() {
        let outcomes = [ChecklistStatus::NotApplicable, ChecklistStatus::NotApplicable];
        assert_eq!(derive_overall_status(&outcomes), InspectionStatus::Pass);
    }

    #[test]
    fn zero_outcomes_passes() {
        assert_eq!(derive_overall_status(&[]), InspectionStatus::Pass);
    }

    #[test]
    fn status_strings_round_trip() {
        for s in [
            InspectionStatus::Pass,
            InspectionStatus::Fail,
            InspectionStatus::NeedsAttention,
        ] {
            assert_eq!(InspectionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(InspectionStatus::parse("broken"), None);
        assert_eq!(ForkliftStatus::parse("maintenance"), Some(ForkliftStatus::Maintenance));
        assert_eq!(ForkliftStatus::parse(""), None);
    }
}
