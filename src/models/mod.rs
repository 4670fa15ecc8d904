pub mod devices;
pub mod events;
pub mod signups;
pub mod songs;
