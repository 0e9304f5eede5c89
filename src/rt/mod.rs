//! The runtime value model (spec §3.3, §4.6-§4.12): the types and
//! algorithms a compiled SN program's `extern` helpers (spec §6) would
//! be implemented against. Distinct from the compile-time front end in
//! the parent module, which only ever deals with source text and ASTs.

pub mod arena;
pub mod array;
pub mod bytes;
pub mod date;
pub mod hash;
pub mod net;
pub mod path;
pub mod proc;
pub mod random;
pub mod string;
pub mod thread;
pub mod uuid;

pub use arena::RtArena;
pub use array::RtArray;
pub use bytes::{byte_array_to_base64, byte_array_to_hex, byte_array_to_string, byte_array_to_string_latin1, bytes_from_base64, bytes_from_hex, string_to_bytes};
pub use date::{RtDate, RtTime};
pub use net::{RtListener, RtStream, RtUdpSocket};
pub use path::RtPath;
pub use proc::RtProcessResult;
pub use random::{RtRandom, StdRandom};
pub use string::RtString;
pub use thread::RtThread;
pub use uuid::RtUuid;
