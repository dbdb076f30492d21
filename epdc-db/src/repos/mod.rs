//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; one repository per entity table
//! - Get/Delete with id 0 short-circuit without a round trip
//! - Uses JOINs and comma-joined aggregates for list views (no N+1)
//! - Uses transactions when a write touches child rows

pub mod company;
pub mod contact;
pub mod dictionary;
pub mod education;
pub mod email;
pub mod owner;
pub mod phone;
pub mod post;
pub mod practice;
pub mod select;
pub mod siren;
pub mod siren_type;

pub use company::{Company, CompanyListItem, CompanyRepo};
pub use contact::{Contact, ContactCompanyItem, ContactListItem, ContactRepo};
pub use dictionary::{
    Department, DictionaryEntry, DictionaryKind, DictionaryRepo, Kind, Rank, Scope,
};
pub use education::{Education, EducationRepo};
pub use email::{Email, EmailRepo};
pub use owner::Owner;
pub use phone::{Phone, PhoneRepo, PhoneSyncPlan};
pub use post::{Post, PostRepo};
pub use practice::{Practice, PracticeListItem, PracticeRepo};
pub use select::SelectItem;
pub use siren::{Siren, SirenListItem, SirenRepo};
pub use siren_type::{SirenType, SirenTypeRepo};

pub use crate::DbError;
