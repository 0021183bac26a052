//! Domain primitives, policies and services.
//!
//! Purpose: hold the business rules of the back office independent of
//! transport and storage. Inbound adapters turn requests into the validated
//! input types defined here; services talk to storage only through
//! [`ports`].
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failures.
//! - Record types: Admin, Customer, CartItem, Employee, Attendance, Product,
//!   Sale and their identifier newtypes.
//! - Ability, PolicyHandler, authorize: role-based access rules.
//! - One service per record family plus the employee EventBus.

mod account;
mod admin;
mod admin_service;
mod auth;
mod avatar;
mod customer;
mod customer_service;
mod employee;
mod employee_service;
pub mod error;
mod events;
mod ids;
mod policy;
pub mod ports;
mod product;
mod product_service;
mod sale;
mod sale_service;
mod service_support;
mod trace_id;
mod validation;

pub use self::account::{
    DEFAULT_AVATAR_URL, PasswordDigest, Profile, ProfileUpdate, ProfileUpdateInput, Registration,
    RegistrationInput,
};
pub use self::admin::{Admin, NewAdmin};
pub use self::admin_service::AdminService;
pub use self::auth::{AccessToken, AuthenticatedUser, LoginCredentials, Role, SignedIn};
pub use self::avatar::{AvatarFolder, AvatarUpload, MAX_AVATAR_BYTES};
pub use self::customer::{CartItem, CartUpdate, Customer, CustomerUpdate, NewCartItem};
pub use self::customer_service::CustomerService;
pub use self::employee::{
    Attendance, ClockIn, ClockOut, Employee, EmployeeInput, EmployeeUpdate, NewEmployee,
};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{EVENT_BUS_CAPACITY, EmployeeEvent, EventBus};
pub use self::ids::{AdminId, AttendanceId, CartId, CustomerId, EmployeeId, ProductId, SaleId};
pub use self::policy::{Ability, Action, PolicyHandler, Reach, Subject, authorize};
pub use self::product::{NewProduct, Product, ProductInput, ProductUpdate};
pub use self::product_service::ProductService;
pub use self::sale::{NewSale, Sale, SaleInput, SaleUpdate};
pub use self::sale_service::SaleService;
pub use self::trace_id::TraceId;
pub use self::validation::{EmailAddress, PASSWORD_MIN, Password};

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
