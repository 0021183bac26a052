//! Diesel table definitions. Must match `backend/migrations` exactly.

diesel::table! {
    /// Back-office accounts.
    admins (id) {
        id -> Uuid,
        /// Unique, lower-cased login email.
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        user_name -> Varchar,
        /// Argon2id PHC string.
        password -> Varchar,
        salt -> Varchar,
        avatar -> Varchar,
        /// `admin` or `manager`.
        role -> Varchar,
        phone -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shop customers.
    customers (id) {
        id -> Uuid,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        user_name -> Varchar,
        password -> Varchar,
        salt -> Varchar,
        avatar -> Varchar,
        phone -> Nullable<Varchar>,
        address -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cart lines; deleted with their customer.
    carts (id) {
        id -> Uuid,
        customer_id -> Uuid,
        product_id -> Uuid,
        quantity -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    employees (id) {
        id -> Uuid,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        phone -> Nullable<Varchar>,
        position -> Nullable<Varchar>,
        salary -> Nullable<Float8>,
        avatar -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shifts; deleted with their employee.
    attendances (id) {
        id -> Uuid,
        employee_id -> Uuid,
        clock_in -> Timestamptz,
        clock_out -> Nullable<Timestamptz>,
        note -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    products (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        price -> Float8,
        stock -> Int4,
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    sales (id) {
        id -> Uuid,
        employee_id -> Uuid,
        product_id -> Uuid,
        amount -> Float8,
        quantity -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(carts -> customers (customer_id));
diesel::joinable!(carts -> products (product_id));
diesel::joinable!(attendances -> employees (employee_id));
diesel::joinable!(sales -> employees (employee_id));
diesel::joinable!(sales -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    admins,
    customers,
    carts,
    employees,
    attendances,
    products,
    sales,
);
