//! Domain models for the plek booking backend.
//!
//! These types mirror the persisted records (posts, packages, bookings,
//! estimates) plus the calendar-range value type shared by the availability
//! and pricing logic.

pub mod booking;
pub mod estimate;
pub mod package;
pub mod post;
pub mod range;

pub use booking::{Booking, NewBooking, PaymentStatus};
pub use estimate::{Estimate, EstimateDraft, SelectedPackage};
pub use package::{Package, PackageCategory, PackageSource, MULTIPLIER_MAX, MULTIPLIER_MIN};
pub use post::{PackageSetting, Post, DEFAULT_NIGHTLY_RATE};
pub use range::{InvalidStayRange, StayRange};
