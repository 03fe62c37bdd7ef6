mod client;
mod helpers;
mod portal;
mod relays;
