pub mod band;
pub mod event;
pub mod musician;
pub mod song;
pub mod token;

pub use band::{Band, Plan};
pub use event::{Event, EventWithRelations};
pub use musician::Musician;
pub use song::Song;
pub use token::ApiToken;
