/// The configuration of the collab system
#[derive(Debug, Clone)]
pub struct Config {
    /// How many characters a generated room id has
    pub room_id_length: usize,
    /// Whether remaining members are notified when someone disconnects.
    /// Joins are always announced, departures only when this is set.
    pub announce_departures: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Short enough to read out loud, long enough to not collide in practice
            room_id_length: 6,
            announce_departures: false,
        }
    }
}
