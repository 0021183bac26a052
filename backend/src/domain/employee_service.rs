//! Employee records, attendance and the live update feed.
//!
//! Updates, clock-in/out and deletions are broadcast on the employee
//! [`EventBus`] after they are stored.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::ports::{AvatarStore, EmployeeRepository};
use crate::domain::service_support::{map_avatar_error, map_delete_error, map_persistence_error};
use crate::domain::{
    Attendance, AttendanceId, AvatarFolder, AvatarUpload, ClockIn, ClockOut, DEFAULT_AVATAR_URL,
    Employee, EmployeeEvent, EmployeeId, EmployeeUpdate, Error, EventBus, NewEmployee,
};

const EMPLOYEE_NOT_FOUND: &str = "Employee not found";
const EMPLOYEE_REFERENCED: &str = "Employee is still referenced by sales";
const ATTENDANCE_NOT_FOUND: &str = "Attendance not found";

/// Employee and attendance service.
#[derive(Clone)]
pub struct EmployeeService {
    employees: Arc<dyn EmployeeRepository>,
    avatars: Arc<dyn AvatarStore>,
    events: EventBus<EmployeeEvent>,
}

impl EmployeeService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        avatars: Arc<dyn AvatarStore>,
        events: EventBus<EmployeeEvent>,
    ) -> Self {
        Self {
            employees,
            avatars,
            events,
        }
    }

    /// Bus carrying [`EmployeeEvent`]s for subscriptions.
    #[must_use]
    pub fn events(&self) -> &EventBus<EmployeeEvent> {
        &self.events
    }

    fn publish(&self, event: EmployeeEvent) {
        let receivers = self.events.publish(event);
        debug!(receivers, "employee event published");
    }

    async fn require(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.employees
            .find_by_id(id)
            .await
            .map_err(|err| map_persistence_error(err, EMPLOYEE_NOT_FOUND))?
            .ok_or_else(|| Error::not_found(EMPLOYEE_NOT_FOUND))
    }

    async fn save(&self, employee: &Employee) -> Result<(), Error> {
        self.employees
            .update(employee)
            .await
            .map_err(|err| map_persistence_error(err, EMPLOYEE_NOT_FOUND))
    }

    /// Hire a new employee.
    pub async fn create(&self, new_employee: NewEmployee) -> Result<Employee, Error> {
        let now = Utc::now();
        let NewEmployee {
            email,
            first_name,
            last_name,
            phone,
            position,
            salary,
        } = new_employee;
        let employee = Employee {
            id: EmployeeId::random(),
            email,
            first_name,
            last_name,
            phone,
            position,
            salary,
            avatar: DEFAULT_AVATAR_URL.to_owned(),
            attendance: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.employees
            .create(&employee)
            .await
            .map_err(|err| map_persistence_error(err, EMPLOYEE_NOT_FOUND))?;
        info!(employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    /// Every employee with attendance.
    pub async fn list(&self) -> Result<Vec<Employee>, Error> {
        self.employees
            .list()
            .await
            .map_err(|err| map_persistence_error(err, EMPLOYEE_NOT_FOUND))
    }

    /// A single employee with attendance.
    pub async fn get(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.require(id).await
    }

    /// Apply a partial update and broadcast the result.
    pub async fn update(&self, id: &EmployeeId, update: &EmployeeUpdate) -> Result<Employee, Error> {
        let mut employee = self.require(id).await?;
        update.apply(&mut employee);
        employee.updated_at = Utc::now();
        self.save(&employee).await?;
        self.publish(EmployeeEvent::Updated(Box::new(employee.clone())));
        Ok(employee)
    }

    /// Remove an employee and broadcast the deletion.
    pub async fn delete(&self, id: &EmployeeId) -> Result<bool, Error> {
        let deleted = self
            .employees
            .delete(id)
            .await
            .map_err(|err| map_delete_error(err, EMPLOYEE_NOT_FOUND, EMPLOYEE_REFERENCED))?;
        if !deleted {
            return Err(Error::not_found(EMPLOYEE_NOT_FOUND));
        }
        info!(employee_id = %id, "employee deleted");
        self.publish(EmployeeEvent::Deleted(true));
        Ok(true)
    }

    /// Open a shift for the employee.
    pub async fn clock_in(&self, id: &EmployeeId, request: ClockIn) -> Result<Employee, Error> {
        let employee = self.require(id).await?;
        let shift = Attendance::open(employee.id, request, Utc::now());
        self.employees
            .add_attendance(&shift)
            .await
            .map_err(|err| map_persistence_error(err, EMPLOYEE_NOT_FOUND))?;
        let employee = self.require(id).await?;
        self.publish(EmployeeEvent::Updated(Box::new(employee.clone())));
        Ok(employee)
    }

    /// Close one of the employee's shifts. Shifts belonging to someone else
    /// are reported as missing.
    pub async fn clock_out(
        &self,
        id: &EmployeeId,
        attendance_id: &AttendanceId,
        request: ClockOut,
    ) -> Result<Employee, Error> {
        let employee = self.require(id).await?;
        let mut shift = employee
            .attendance
            .into_iter()
            .find(|shift| &shift.id == attendance_id)
            .ok_or_else(|| Error::not_found(ATTENDANCE_NOT_FOUND))?;
        shift.close(request, Utc::now())?;
        self.employees
            .update_attendance(&shift)
            .await
            .map_err(|err| map_persistence_error(err, ATTENDANCE_NOT_FOUND))?;
        let employee = self.require(id).await?;
        self.publish(EmployeeEvent::Updated(Box::new(employee.clone())));
        Ok(employee)
    }

    /// Every attendance entry.
    pub async fn list_attendance(&self) -> Result<Vec<Attendance>, Error> {
        self.employees
            .list_attendance()
            .await
            .map_err(|err| map_persistence_error(err, ATTENDANCE_NOT_FOUND))
    }

    /// A single attendance entry.
    pub async fn get_attendance(&self, id: &AttendanceId) -> Result<Attendance, Error> {
        self.employees
            .find_attendance(id)
            .await
            .map_err(|err| map_persistence_error(err, ATTENDANCE_NOT_FOUND))?
            .ok_or_else(|| Error::not_found(ATTENDANCE_NOT_FOUND))
    }

    /// Store a new avatar on the employee record.
    pub async fn update_avatar(
        &self,
        id: &EmployeeId,
        upload: &AvatarUpload,
    ) -> Result<bool, Error> {
        let mut employee = self.require(id).await?;
        employee.avatar = self
            .avatars
            .store(AvatarFolder::Employee, upload)
            .await
            .map_err(map_avatar_error)?;
        employee.updated_at = Utc::now();
        self.save(&employee).await?;
        Ok(true)
    }

    /// Reset the employee avatar to the default image.
    pub async fn delete_avatar(&self, id: &EmployeeId) -> Result<bool, Error> {
        let mut employee = self.require(id).await?;
        DEFAULT_AVATAR_URL.clone_into(&mut employee.avatar);
        employee.updated_at = Utc::now();
        self.save(&employee).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAvatarStore, MockEmployeeRepository, PersistenceError};
    use crate::domain::{EmployeeInput, ErrorCode};
    use futures_util::StreamExt;
    use rstest::{fixture, rstest};

    fn service(repo: MockEmployeeRepository) -> EmployeeService {
        service_with_avatars(repo, MockAvatarStore::new())
    }

    fn service_with_avatars(repo: MockEmployeeRepository, avatars: MockAvatarStore) -> EmployeeService {
        EmployeeService::new(Arc::new(repo), Arc::new(avatars), EventBus::default())
    }

    #[fixture]
    fn employee() -> Employee {
        let now = Utc::now();
        Employee {
            id: EmployeeId::random(),
            email: "clerk@shop.io".into(),
            first_name: "Ola".into(),
            last_name: "Nordmann".into(),
            phone: None,
            position: Some("cashier".into()),
            salary: None,
            avatar: DEFAULT_AVATAR_URL.into(),
            attendance: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn update_publishes_employee_updated(employee: Employee) {
        let id = employee.id;
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(employee)));
        repo.expect_update().times(1).return_once(|_| Ok(()));
        let service = service(repo);
        let mut feed = Box::pin(service.events().stream());

        let update = EmployeeUpdate::try_from_input(&EmployeeInput {
            position: Some("supervisor".into()),
            ..EmployeeInput::default()
        })
        .expect("valid update");
        let updated = service.update(&id, &update).await.expect("update succeeds");

        match feed.next().await {
            Some(EmployeeEvent::Updated(published)) => assert_eq!(*published, updated),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn delete_publishes_employee_deleted() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_delete().return_once(|_| Ok(true));
        let service = service(repo);
        let mut feed = Box::pin(service.events().stream());

        assert!(service.delete(&EmployeeId::random()).await.expect("deleted"));
        assert_eq!(feed.next().await, Some(EmployeeEvent::Deleted(true)));
    }

    #[rstest]
    #[tokio::test]
    async fn employee_with_sales_cannot_be_deleted() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_delete()
            .return_once(|_| Err(PersistenceError::foreign_key_violation("sales_employee_id_fkey")));
        let service = service(repo);
        let mut feed = Box::pin(service.events().stream());

        let err = service
            .delete(&EmployeeId::random())
            .await
            .expect_err("referenced employee");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Employee is still referenced by sales");
        drop(service);
        assert_eq!(feed.next().await, None);
    }

    #[rstest]
    #[tokio::test]
    async fn clock_out_of_unknown_shift_is_not_found(employee: Employee) {
        let id = employee.id;
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(employee)));
        repo.expect_update_attendance().never();

        let err = service(repo)
            .clock_out(&id, &AttendanceId::random(), ClockOut::default())
            .await
            .expect_err("unknown shift");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Attendance not found");
    }

    #[rstest]
    #[tokio::test]
    async fn clock_in_stores_open_shift(employee: Employee) {
        let id = employee.id;
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(Some(employee.clone())));
        repo.expect_add_attendance()
            .withf(move |shift| shift.employee_id == id && shift.clock_out.is_none())
            .times(1)
            .return_once(|_| Ok(()));

        service(repo)
            .clock_in(&id, ClockIn::default())
            .await
            .expect("clocked in");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_attendance_is_not_found() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_attendance().return_once(|_| Ok(None));

        let err = service(repo)
            .get_attendance(&AttendanceId::random())
            .await
            .expect_err("missing attendance");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn avatar_updates_point_at_the_stored_file(employee: Employee) {
        let id = employee.id;
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(employee)));
        repo.expect_update()
            .withf(|saved| saved.avatar == "/avatars/employee/badge-7.jpg")
            .times(1)
            .return_once(|_| Ok(()));
        let mut avatars = MockAvatarStore::new();
        avatars
            .expect_store()
            .withf(|folder, _| *folder == AvatarFolder::Employee)
            .return_once(|_, _| Ok("/avatars/employee/badge-7.jpg".to_owned()));

        let upload = AvatarUpload::try_new("badge.jpg", vec![0xff, 0xd8]).expect("valid upload");
        assert!(
            service_with_avatars(repo, avatars)
                .update_avatar(&id, &upload)
                .await
                .expect("stored")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_the_avatar_restores_the_default(mut employee: Employee) {
        employee.avatar = "/avatars/employee/badge-7.jpg".into();
        let id = employee.id;
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(employee)));
        repo.expect_update()
            .withf(|saved| saved.avatar == DEFAULT_AVATAR_URL)
            .times(1)
            .return_once(|_| Ok(()));

        assert!(service(repo).delete_avatar(&id).await.expect("reset"));
    }
}
