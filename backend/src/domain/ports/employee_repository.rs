//! Port for employee and attendance storage.

use async_trait::async_trait;

use crate::domain::{Attendance, AttendanceId, Employee, EmployeeId};

use super::PersistenceError;

/// Storage of employees and their attendance log.
///
/// Returned employees carry their attendance, oldest clock-in first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert a new employee. Duplicate emails yield
    /// [`PersistenceError::UniqueViolation`].
    async fn create(&self, employee: &Employee) -> Result<(), PersistenceError>;

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, PersistenceError>;

    async fn list(&self) -> Result<Vec<Employee>, PersistenceError>;

    /// Overwrite the employee row; attendance is left untouched.
    async fn update(&self, employee: &Employee) -> Result<(), PersistenceError>;

    /// Remove an employee together with their attendance.
    async fn delete(&self, id: &EmployeeId) -> Result<bool, PersistenceError>;

    async fn add_attendance(&self, attendance: &Attendance) -> Result<(), PersistenceError>;

    async fn update_attendance(&self, attendance: &Attendance) -> Result<(), PersistenceError>;

    async fn find_attendance(
        &self,
        id: &AttendanceId,
    ) -> Result<Option<Attendance>, PersistenceError>;

    /// Every attendance entry, oldest clock-in first.
    async fn list_attendance(&self) -> Result<Vec<Attendance>, PersistenceError>;
}
