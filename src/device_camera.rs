pub mod capture_surface;
pub mod impl_fake;
pub mod impl_nokhwa;
pub mod interface;
