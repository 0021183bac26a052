//! Employee table with embedded attendance.

use async_trait::async_trait;

use crate::domain::ports::{EmployeeRepository, PersistenceError};
use crate::domain::{Attendance, AttendanceId, Employee, EmployeeId};

use super::{InMemoryStore, email_taken, missing_reference, remove, replace};

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn create(&self, employee: &Employee) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.employees.iter().any(|row| row.email == employee.email) {
            return Err(email_taken("employees_email_key"));
        }
        let mut stored = employee.clone();
        stored.attendance.clear();
        tables.employees.push(stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|row| row.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, PersistenceError> {
        Ok(self.tables.read().await.employees.clone())
    }

    async fn update(&self, employee: &Employee) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .employees
            .iter()
            .any(|row| row.id != employee.id && row.email == employee.email)
        {
            return Err(email_taken("employees_email_key"));
        }
        let slot = tables
            .employees
            .iter_mut()
            .find(|row| row.id == employee.id)
            .ok_or_else(|| PersistenceError::not_found("employee"))?;
        let attendance = std::mem::take(&mut slot.attendance);
        *slot = employee.clone();
        slot.attendance = attendance;
        Ok(())
    }

    /// Sales keep their employee alive; attendance goes with it.
    async fn delete(&self, id: &EmployeeId) -> Result<bool, PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.sales.iter().any(|sale| sale.employee_id == *id) {
            return Err(missing_reference("sales_employee_id_fkey"));
        }
        Ok(remove(&mut tables.employees, |row| row.id == *id))
    }

    async fn add_attendance(&self, attendance: &Attendance) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        let employee = tables
            .employees
            .iter_mut()
            .find(|row| row.id == attendance.employee_id)
            .ok_or_else(|| missing_reference("attendances_employee_id_fkey"))?;
        employee.attendance.push(attendance.clone());
        employee.attendance.sort_by_key(|entry| entry.clock_in);
        Ok(())
    }

    async fn update_attendance(&self, attendance: &Attendance) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        let employee = tables
            .employees
            .iter_mut()
            .find(|row| row.id == attendance.employee_id)
            .ok_or_else(|| PersistenceError::not_found("attendance"))?;
        replace(
            &mut employee.attendance,
            |row| row.id == attendance.id,
            attendance,
            "attendance",
        )?;
        employee.attendance.sort_by_key(|entry| entry.clock_in);
        Ok(())
    }

    async fn find_attendance(
        &self,
        id: &AttendanceId,
    ) -> Result<Option<Attendance>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .flat_map(|employee| employee.attendance.iter())
            .find(|entry| entry.id == *id)
            .cloned())
    }

    async fn list_attendance(&self) -> Result<Vec<Attendance>, PersistenceError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<Attendance> = tables
            .employees
            .iter()
            .flat_map(|employee| employee.attendance.iter().cloned())
            .collect();
        entries.sort_by_key(|entry| entry.clock_in);
        Ok(entries)
    }
}
