//! Structured RPC error details: a status plus a typed bag of diagnostic
//! payloads, and the in-band `AltResult` alternative.

mod code;

pub mod alt;
pub mod any;
pub mod bag;
pub mod details;
pub mod ids;
pub mod protocol;
pub mod render;
pub mod status;
pub mod status_error;

pub use alt::{AltResult, ErrorDetails};
pub use any::{AnyDetail, TypedMessage};
pub use bag::{Classified, DetailBag, DetailKind, KnownDetail, classify};
pub use code::{Code, DetailError};
pub use ids::UserId;
pub use protocol::{
    CreateUserAltResponse, CreateUserRequest, CreateUserResponse, UserData, UserInfo, UserStatus,
};
pub use render::RenderOptions;
pub use status::{Status, WireStatus, status_with_details};
pub use status_error::{StatusError, extract};
