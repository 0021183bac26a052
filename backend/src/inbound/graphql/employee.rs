//! Employee, attendance and employee-event resolvers.

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject, Subscription, Upload};
use chrono::{DateTime, Utc};
use futures_util::future;
use futures_util::{Stream, StreamExt};

use super::context::services;
use super::error::IntoGraphql;
use super::guard::PolicyGuard;
use super::types::id;
use super::uploads::read_avatar;
use crate::domain::{
    Attendance, AttendanceId, ClockIn, ClockOut, Employee, EmployeeEvent, EmployeeId, EmployeeInput,
    EmployeeUpdate, NewEmployee, PolicyHandler, Reach,
};

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Attendance")]
pub struct AttendanceObject {
    pub id: ID,
    pub employee_id: ID,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Attendance> for AttendanceObject {
    fn from(shift: Attendance) -> Self {
        Self {
            id: id(shift.id),
            employee_id: id(shift.employee_id),
            clock_in: shift.clock_in,
            clock_out: shift.clock_out,
            note: shift.note,
            created_at: shift.created_at,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Employee")]
pub struct EmployeeObject {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub avatar: String,
    pub attendance: Vec<AttendanceObject>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeObject {
    fn from(employee: Employee) -> Self {
        Self {
            id: id(employee.id),
            email: employee.email,
            first_name: employee.first_name,
            last_name: employee.last_name,
            phone: employee.phone,
            position: employee.position,
            salary: employee.salary,
            avatar: employee.avatar,
            attendance: employee
                .attendance
                .into_iter()
                .map(AttendanceObject::from)
                .collect(),
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[derive(InputObject, Debug, Clone)]
pub struct CreateEmployeeInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}

impl From<CreateEmployeeInput> for EmployeeInput {
    fn from(input: CreateEmployeeInput) -> Self {
        Self {
            email: Some(input.email),
            first_name: Some(input.first_name),
            last_name: Some(input.last_name),
            phone: input.phone,
            position: input.position,
            salary: input.salary,
        }
    }
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct UpdateEmployeeInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}

impl From<UpdateEmployeeInput> for EmployeeInput {
    fn from(input: UpdateEmployeeInput) -> Self {
        Self {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            position: input.position,
            salary: input.salary,
        }
    }
}

/// Shift start; `clockIn` defaults to now.
#[derive(InputObject, Debug, Clone, Default)]
pub struct ClockInInput {
    pub clock_in: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Shift end; `clockOut` defaults to now.
#[derive(InputObject, Debug, Clone, Default)]
pub struct ClockOutInput {
    pub clock_out: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

#[derive(Default)]
pub struct EmployeeQuery;

#[Object]
impl EmployeeQuery {
    async fn get_employees(&self, ctx: &Context<'_>) -> Result<Vec<EmployeeObject>> {
        PolicyGuard::new(PolicyHandler::ReadEmployee).check(ctx, Reach::Every)?;
        let employees = services(ctx)?.employees.list().await.into_graphql()?;
        Ok(employees.into_iter().map(EmployeeObject::from).collect())
    }

    async fn get_employee(&self, ctx: &Context<'_>, id: ID) -> Result<EmployeeObject> {
        let (_, id) = PolicyGuard::new(PolicyHandler::ReadEmployee).check_record(ctx, &id, EmployeeId::parse)?;
        let employee = services(ctx)?.employees.get(&id).await.into_graphql()?;
        Ok(employee.into())
    }

    async fn get_all_attendance(&self, ctx: &Context<'_>) -> Result<Vec<AttendanceObject>> {
        PolicyGuard::new(PolicyHandler::ReadAttendance).check(ctx, Reach::Every)?;
        let shifts = services(ctx)?.employees.list_attendance().await.into_graphql()?;
        Ok(shifts.into_iter().map(AttendanceObject::from).collect())
    }

    async fn get_attendance(&self, ctx: &Context<'_>, id: ID) -> Result<AttendanceObject> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::ReadAttendance).check_record(ctx, &id, AttendanceId::parse)?;
        let shift = services(ctx)?.employees.get_attendance(&id).await.into_graphql()?;
        Ok(shift.into())
    }
}

#[derive(Default)]
pub struct EmployeeMutation;

#[Object]
impl EmployeeMutation {
    async fn create_employee(&self, ctx: &Context<'_>, input: CreateEmployeeInput) -> Result<EmployeeObject> {
        PolicyGuard::new(PolicyHandler::CreateEmployee).check(ctx, Reach::Some)?;
        let new_employee = NewEmployee::try_from_input(&input.into()).into_graphql()?;
        let employee = services(ctx)?.employees.create(new_employee).await.into_graphql()?;
        Ok(employee.into())
    }

    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateEmployeeInput,
    ) -> Result<EmployeeObject> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateEmployee).check_record(ctx, &id, EmployeeId::parse)?;
        let update = EmployeeUpdate::try_from_input(&input.into()).into_graphql()?;
        let employee = services(ctx)?.employees.update(&id, &update).await.into_graphql()?;
        Ok(employee.into())
    }

    /// Clock an employee in.
    async fn create_attendance(
        &self,
        ctx: &Context<'_>,
        id: ID,
        clock_in_input: ClockInInput,
    ) -> Result<EmployeeObject> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateEmployee).check_record(ctx, &id, EmployeeId::parse)?;
        let request = ClockIn {
            at: clock_in_input.clock_in,
            note: clock_in_input.note,
        };
        let employee = services(ctx)?.employees.clock_in(&id, request).await.into_graphql()?;
        Ok(employee.into())
    }

    /// Clock an employee out of an open shift.
    async fn update_attendance(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
        attendance_id: ID,
        clock_out_input: ClockOutInput,
    ) -> Result<EmployeeObject> {
        let (_, employee_id) = PolicyGuard::new(PolicyHandler::UpdateEmployee).check_record(
            ctx,
            &employee_id,
            EmployeeId::parse,
        )?;
        let attendance_id = AttendanceId::parse(&attendance_id).into_graphql()?;
        let request = ClockOut {
            at: clock_out_input.clock_out,
            note: clock_out_input.note,
        };
        let employee = services(ctx)?
            .employees
            .clock_out(&employee_id, &attendance_id, request)
            .await
            .into_graphql()?;
        Ok(employee.into())
    }

    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::DeleteEmployee).check_record(ctx, &id, EmployeeId::parse)?;
        services(ctx)?.employees.delete(&id).await.into_graphql()
    }

    async fn update_employee_avatar(&self, ctx: &Context<'_>, id: ID, avatar: Upload) -> Result<bool> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateEmployee).check_record(ctx, &id, EmployeeId::parse)?;
        let upload = read_avatar(ctx, &avatar).await?;
        services(ctx)?
            .employees
            .update_avatar(&id, &upload)
            .await
            .into_graphql()
    }

    async fn delete_employee_avatar(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateEmployee).check_record(ctx, &id, EmployeeId::parse)?;
        services(ctx)?.employees.delete_avatar(&id).await.into_graphql()
    }
}

/// Live employee changes, fanned out from the employee event bus.
#[derive(Default)]
pub struct EmployeeSubscription;

#[Subscription]
impl EmployeeSubscription {
    async fn employee_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = EmployeeObject>> {
        PolicyGuard::new(PolicyHandler::ReadEmployee).check(ctx, Reach::Some)?;
        let events = services(ctx)?.employees.events().stream();
        Ok(events.filter_map(|event| {
            future::ready(match event {
                EmployeeEvent::Updated(employee) => Some(EmployeeObject::from(*employee)),
                EmployeeEvent::Deleted(_) => None,
            })
        }))
    }

    async fn employee_deleted(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = bool>> {
        PolicyGuard::new(PolicyHandler::ReadEmployee).check(ctx, Reach::Some)?;
        let events = services(ctx)?.employees.events().stream();
        Ok(events.filter_map(|event| {
            future::ready(match event {
                EmployeeEvent::Deleted(deleted) => Some(deleted),
                EmployeeEvent::Updated(_) => None,
            })
        }))
    }
}
