//! Birth dates are exchanged as `YYYY-MM-DD` strings.

time::serde::format_description!(birth_date_format, Date, "[year]-[month]-[day]");

pub(crate) use birth_date_format::{deserialize, serialize};
