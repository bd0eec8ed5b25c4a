//! Core types shared by the Vitrine admin client and CLI.
//!
//! Everything here mirrors a wire shape of the content backend: the
//! response envelope, the authenticated identity and its read-only
//! projection, and the catalog records managed from the dashboard.

pub mod banner;
pub mod category;
pub mod envelope;
pub mod error;
mod form;
pub mod identity;
pub mod link;
pub mod top_data;

pub use banner::{HomeData, NewPremiumBanner, NewThumbnail, PremiumBanner, Thumbnail};
pub use category::{Category, CategoryDetails, NewCategory, NewSubcategory, Subcategory};
pub use envelope::Envelope;
pub use error::BusinessError;
pub use identity::{IdentityRecord, LoginRequest, Role, SessionView};
pub use link::{NewTelegramLink, TelegramLink};
pub use top_data::{TopData, TopDataInput, TopDataUpdate};
