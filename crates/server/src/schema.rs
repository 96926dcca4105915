use std::fmt::Display;

use axum::response::IntoResponse;
use db::{reservation, user};
use serde_json::{json, Value};

/// Generate example values for OAPI documentation.
macro_rules! generate_examples {
    ($name:ident, $type:ty, $expr:expr) => {
        ::paste::paste! {
            #[doc = concat!("Generate example [`", stringify!($type), "`] value for OAPI documentation.")]
            pub(crate) fn [<example_ $name>]() -> $type {
                $expr
            }
        }
    };

    ($name:ident, $type:ty, $expr:expr; $($name_repeat:ident, $type_repeat:ty, $expr_repeat:expr);+) => {
        generate_examples!($name, $type, $expr);
        generate_examples!($($name_repeat, $type_repeat, $expr_repeat);+);
    }
}

/// Convert an error into a JSON value suitable for OAPI documentation.
pub(crate) fn example_error<E: Display + IntoResponse>(err: E) -> Value {
    let error = err.to_string();

    json! {{
        "code": err.into_response().status().as_u16(),
        "error": error,
    }}
}

generate_examples!(
    database_identifier, i64, 1;
    timestamp, i64, 1672531200;
    token, String, String::from("UYEIngStyH6Bxu1hLFIIwBxLgyMBhMQv4SVR1KzzbvzIDCSMcwwF8ApXagqyuWbh");
    name, String, String::from("Jane Doe");
    email, String, String::from("jane@example.com");
    username, String, String::from("jane_doe");
    password, String, String::from("correct horse battery staple");
    birth_date, String, String::from("1990-05-17");
    role, user::Role, user::Role::Student;
    class_name, String, String::from("Morning yoga");
    class_description, String, String::from("Slow flow for all levels.");
    capacity, i32, 12;
    available_spots, u64, 3;
    waitlist_position, i32, 1;
    reservation_status, reservation::Status, reservation::Status::Confirmed
);
