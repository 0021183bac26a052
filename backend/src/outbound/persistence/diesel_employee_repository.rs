//! PostgreSQL-backed `EmployeeRepository` with the attendance log.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{EmployeeRepository, PersistenceError};
use crate::domain::{Attendance, AttendanceId, Employee, EmployeeId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AttendanceChangeset, AttendanceRow, EmployeeRow};
use super::pool::DbPool;
use super::schema::{attendances, employees};

#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn employee_to_row(employee: &Employee) -> EmployeeRow {
    EmployeeRow {
        id: *employee.id.as_uuid(),
        email: employee.email.clone(),
        first_name: employee.first_name.clone(),
        last_name: employee.last_name.clone(),
        phone: employee.phone.clone(),
        position: employee.position.clone(),
        salary: employee.salary,
        avatar: employee.avatar.clone(),
        created_at: employee.created_at,
        updated_at: employee.updated_at,
    }
}

fn attendance_to_row(attendance: &Attendance) -> AttendanceRow {
    AttendanceRow {
        id: *attendance.id.as_uuid(),
        employee_id: *attendance.employee_id.as_uuid(),
        clock_in: attendance.clock_in,
        clock_out: attendance.clock_out,
        note: attendance.note.clone(),
        created_at: attendance.created_at,
    }
}

fn row_to_attendance(row: AttendanceRow) -> Attendance {
    Attendance {
        id: AttendanceId::from(row.id),
        employee_id: EmployeeId::from(row.employee_id),
        clock_in: row.clock_in,
        clock_out: row.clock_out,
        note: row.note,
        created_at: row.created_at,
    }
}

fn row_to_employee(row: EmployeeRow, attendance: Vec<Attendance>) -> Employee {
    Employee {
        id: EmployeeId::from(row.id),
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
        position: row.position,
        salary: row.salary,
        avatar: row.avatar,
        attendance,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn assemble(rows: Vec<EmployeeRow>, attendance_rows: Vec<AttendanceRow>) -> Vec<Employee> {
    let mut by_employee: HashMap<Uuid, Vec<Attendance>> = HashMap::new();
    for row in attendance_rows {
        by_employee
            .entry(row.employee_id)
            .or_default()
            .push(row_to_attendance(row));
    }
    rows.into_iter()
        .map(|row| {
            let attendance = by_employee.remove(&row.id).unwrap_or_default();
            row_to_employee(row, attendance)
        })
        .collect()
}

async fn load_with_attendance(
    conn: &mut AsyncPgConnection,
    rows: Vec<EmployeeRow>,
) -> Result<Vec<Employee>, diesel::result::Error> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let attendance_rows: Vec<AttendanceRow> = attendances::table
        .filter(attendances::employee_id.eq_any(ids))
        .order_by(attendances::clock_in)
        .select(AttendanceRow::as_select())
        .load(conn)
        .await?;
    Ok(assemble(rows, attendance_rows))
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn create(&self, employee: &Employee) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(employees::table)
            .values(&employee_to_row(employee))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = employees::table
            .find(*id.as_uuid())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let employees = load_with_attendance(&mut conn, vec![row])
            .await
            .map_err(map_diesel_error)?;
        Ok(employees.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Employee>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .order_by(employees::created_at)
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_with_attendance(&mut conn, rows)
            .await
            .map_err(map_diesel_error)
    }

    async fn update(&self, employee: &Employee) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(employees::table.find(*employee.id.as_uuid()))
            .set(&employee_to_row(employee))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PersistenceError::not_found("employee"));
        }
        Ok(())
    }

    async fn delete(&self, id: &EmployeeId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = *id.as_uuid();
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(attendances::table.filter(attendances::employee_id.eq(target)))
                        .execute(conn)
                        .await?;
                    diesel::delete(employees::table.find(target))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn add_attendance(&self, attendance: &Attendance) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(attendances::table)
            .values(&attendance_to_row(attendance))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update_attendance(&self, attendance: &Attendance) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = AttendanceChangeset {
            clock_in: attendance.clock_in,
            clock_out: attendance.clock_out,
            note: attendance.note.as_deref(),
        };
        let updated = diesel::update(attendances::table.find(*attendance.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PersistenceError::not_found("attendance"));
        }
        Ok(())
    }

    async fn find_attendance(
        &self,
        id: &AttendanceId,
    ) -> Result<Option<Attendance>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = attendances::table
            .find(*id.as_uuid())
            .select(AttendanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_attendance))
    }

    async fn list_attendance(&self) -> Result<Vec<Attendance>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AttendanceRow> = attendances::table
            .order_by(attendances::clock_in)
            .select(AttendanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_attendance).collect())
    }
}
