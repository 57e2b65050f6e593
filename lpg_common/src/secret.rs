use std::{
    fmt,
    fmt::{Debug, Display},
};

/// A wrapper around sensitive values (JWT secrets, password material) that redacts the value in
/// `Debug` and `Display` output. The only way to get at the inner value is an explicit
/// [`Secret::reveal`] call, which makes accidental logging easy to spot in review.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
