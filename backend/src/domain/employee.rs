//! Employees and their attendance log.

use chrono::{DateTime, Utc};

use super::validation::{blank_to_none, non_negative_amount, optional_text, required_text};
use super::{AttendanceId, EmailAddress, EmployeeId, Error};

/// Staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub avatar: String,
    /// Attendance entries, oldest first.
    pub attendance: Vec<Attendance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One shift: a clock-in and, once finished, a clock-out.
///
/// ## Invariants
/// - `clock_out`, when set, is not earlier than `clock_in`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub id: AttendanceId,
    pub employee_id: EmployeeId,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw employee input shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct EmployeeInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}

/// Validated new employee.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}

fn salary(value: Option<f64>) -> Result<Option<f64>, Error> {
    value.map(|s| non_negative_amount("salary", s)).transpose()
}

impl NewEmployee {
    /// Validate a create payload; email and both names are required.
    pub fn try_from_input(input: &EmployeeInput) -> Result<Self, Error> {
        let email = input
            .email
            .as_deref()
            .ok_or_else(|| Error::invalid_request("email must not be empty"))?;
        Ok(Self {
            email: EmailAddress::parse(email)?.into_inner(),
            first_name: required_text("firstName", input.first_name.as_deref().unwrap_or_default())?,
            last_name: required_text("lastName", input.last_name.as_deref().unwrap_or_default())?,
            phone: blank_to_none(input.phone.as_deref()),
            position: blank_to_none(input.position.as_deref()),
            salary: salary(input.salary)?,
        })
    }
}

/// Validated partial employee update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeUpdate {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    position: Option<String>,
    salary: Option<f64>,
}

impl EmployeeUpdate {
    /// Validate an update payload, rejecting one that changes nothing.
    pub fn try_from_input(input: &EmployeeInput) -> Result<Self, Error> {
        let update = Self {
            email: input
                .email
                .as_deref()
                .map(EmailAddress::parse)
                .transpose()?
                .map(EmailAddress::into_inner),
            first_name: optional_text("firstName", input.first_name.as_deref())?,
            last_name: optional_text("lastName", input.last_name.as_deref())?,
            phone: blank_to_none(input.phone.as_deref()),
            position: blank_to_none(input.position.as_deref()),
            salary: salary(input.salary)?,
        };
        if update == Self::default() {
            return Err(Error::invalid_request("update must change at least one field"));
        }
        Ok(update)
    }

    /// Overwrite the supplied fields of `employee`.
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(email) = &self.email {
            employee.email.clone_from(email);
        }
        if let Some(first_name) = &self.first_name {
            employee.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            employee.last_name.clone_from(last_name);
        }
        if self.phone.is_some() {
            employee.phone.clone_from(&self.phone);
        }
        if self.position.is_some() {
            employee.position.clone_from(&self.position);
        }
        if self.salary.is_some() {
            employee.salary = self.salary;
        }
    }
}

/// Clock-in request; the time defaults to now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockIn {
    pub at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Clock-out request; the time defaults to now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockOut {
    pub at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl Attendance {
    /// Open a new shift for `employee_id`.
    #[must_use]
    pub fn open(employee_id: EmployeeId, request: ClockIn, now: DateTime<Utc>) -> Self {
        Self {
            id: AttendanceId::random(),
            employee_id,
            clock_in: request.at.unwrap_or(now),
            clock_out: None,
            note: blank_to_none(request.note.as_deref()),
            created_at: now,
        }
    }

    /// Close the shift. Clocking out again moves the clock-out time.
    pub fn close(&mut self, request: ClockOut, now: DateTime<Utc>) -> Result<(), Error> {
        let at = request.at.unwrap_or(now);
        if at < self.clock_in {
            return Err(Error::invalid_request("clock-out must not precede clock-in"));
        }
        self.clock_out = Some(at);
        if let Some(note) = blank_to_none(request.note.as_deref()) {
            self.note = Some(note);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn input() -> EmployeeInput {
        EmployeeInput {
            email: Some("Clerk@Shop.io".into()),
            first_name: Some("Ola".into()),
            last_name: Some("Nordmann".into()),
            salary: Some(1200.5),
            ..EmployeeInput::default()
        }
    }

    #[rstest]
    fn new_employee_normalises_email() {
        let employee = NewEmployee::try_from_input(&input()).expect("valid employee");
        assert_eq!(employee.email, "clerk@shop.io");
    }

    #[rstest]
    #[case(EmployeeInput { email: None, ..input() })]
    #[case(EmployeeInput { first_name: None, ..input() })]
    #[case(EmployeeInput { salary: Some(-1.0), ..input() })]
    fn new_employee_rejects_invalid_input(#[case] input: EmployeeInput) {
        assert!(NewEmployee::try_from_input(&input).is_err());
    }

    #[rstest]
    fn empty_update_is_rejected() {
        assert!(EmployeeUpdate::try_from_input(&EmployeeInput::default()).is_err());
    }

    #[rstest]
    fn clock_out_before_clock_in_is_rejected() {
        let now = Utc::now();
        let mut shift = Attendance::open(EmployeeId::random(), ClockIn::default(), now);
        let err = shift
            .close(
                ClockOut {
                    at: Some(now - Duration::minutes(5)),
                    note: None,
                },
                now,
            )
            .expect_err("clock-out precedes clock-in");
        assert_eq!(err.message(), "clock-out must not precede clock-in");
        assert!(shift.clock_out.is_none());
    }

    #[rstest]
    fn closing_a_shift_keeps_the_opening_note_unless_replaced() {
        let now = Utc::now();
        let mut shift = Attendance::open(
            EmployeeId::random(),
            ClockIn {
                at: None,
                note: Some("early shift".into()),
            },
            now,
        );
        shift
            .close(ClockOut::default(), now + Duration::hours(8))
            .expect("valid clock-out");
        assert_eq!(shift.note.as_deref(), Some("early shift"));
        assert_eq!(shift.clock_out, Some(now + Duration::hours(8)));
    }
}
