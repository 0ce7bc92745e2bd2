//! Repository layer for database operations.

pub mod business;
pub mod drop;
pub mod member;
pub mod owner;

pub use business::BusinessRepository;
pub use drop::{
    DropError, DropRepository, DropWithServices, FinalizeDropInput, FinalizedDrop, PaidBatch,
    PayDropsInput, PaymentNoticeInput, ServiceInput,
};
pub use member::{DropDetail, MemberError, MemberProfile, MemberRepository};
pub use owner::{OwnerProfile, OwnerRepository};
