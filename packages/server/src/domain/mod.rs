//! ドメイン層
//!
//! Room / Session / ChatMessage とそれらの不変条件を定義します。
//! ネットワークや JSON には依存しません。

pub mod broadcast;
pub mod entity;
pub mod error;
pub mod factory;
pub mod pusher;
pub mod repository;
pub mod room;
pub mod session;
pub mod value_object;

pub use broadcast::fan_out;
pub use entity::{ChatMessage, DeliveryReport, RoomSnapshot, RoomSummary};
pub use error::{DeliveryError, RoomError, ValueObjectError};
pub use factory::{RoomIdGenerator, SequentialRoomIdGenerator};
pub use pusher::MessageSink;
pub use repository::RoomRepository;
pub use room::{DEFAULT_HISTORY_CAPACITY, Room, SharedRoom};
pub use session::{Session, SessionCommand, SessionReply};
pub use value_object::{RoomId, SessionId, Timestamp};
