use crate::location::Resolver;
use std::sync::Mutex;

pub struct AppState {
    pub resolver: Mutex<Resolver>,
}
