//! # Shift Repository
//!
//! Staff scheduling. A staff member cannot hold two overlapping shifts on
//! the same date, and only active staff can be scheduled.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::info;

use crema_core::validation::validate_shift;
use crema_core::{Shift, StaffRole};

use super::new_id;
use crate::error::{reject_if_any, StoreError, StoreResult};
use crate::store::{SharedData, StoreData};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub staff_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub position: StaffRole,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewShift {
    fn into_shift(self, id: String) -> Shift {
        Shift {
            id,
            staff_id: self.staff_id.trim().to_string(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            position: self.position,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShiftRepository {
    data: SharedData,
}

impl ShiftRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        ShiftRepository { data }
    }

    /// Lists shifts in schedule order, optionally for one date or one
    /// staff member.
    pub async fn list(&self, date: Option<NaiveDate>, staff_id: Option<&str>) -> Vec<Shift> {
        let data = self.data.read().await;
        let mut shifts: Vec<Shift> = data
            .shifts
            .iter()
            .filter(|s| date.map_or(true, |d| s.date == d))
            .filter(|s| staff_id.map_or(true, |id| s.staff_id == id))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        shifts
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Shift> {
        let data = self.data.read().await;
        data.shifts.iter().find(|s| s.id == id).cloned()
    }

    pub async fn schedule(&self, input: NewShift) -> StoreResult<Shift> {
        let shift = input.into_shift(new_id("sh"));

        let mut data = self.data.write().await;
        check(&data, &shift)?;
        data.shifts.push(shift.clone());

        info!(
            shift_id = %shift.id,
            staff_id = %shift.staff_id,
            date = %shift.date,
            "Shift scheduled"
        );
        Ok(shift)
    }

    /// Replaces a shift's details, keeping its id.
    pub async fn update(&self, id: &str, input: NewShift) -> StoreResult<Shift> {
        let shift = input.into_shift(id.to_string());

        let mut data = self.data.write().await;
        let index = data
            .shifts
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Shift", id))?;
        check(&data, &shift)?;
        data.shifts[index] = shift.clone();
        Ok(shift)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<Shift> {
        let mut data = self.data.write().await;
        let index = data
            .shifts
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Shift", id))?;
        Ok(data.shifts.remove(index))
    }
}

fn check(data: &StoreData, shift: &Shift) -> StoreResult<()> {
    let staff = data.staff.iter().find(|s| s.id == shift.staff_id);
    reject_if_any(validate_shift(shift, staff, &data.shifts))
}
