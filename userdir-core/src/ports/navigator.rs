//! Navigator port - leaves the directory view

/// Side-effecting navigation out of the directory
pub trait Navigator {
    /// Send the caller to the sign-up entry point
    fn redirect_to_signup(&self);
}
