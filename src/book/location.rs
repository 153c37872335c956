use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::alphabet::Alphabet;
use crate::core::layout::{BOOKS_PER_ROOM, BOOKS_PER_SHELF, BOOKS_PER_WALL};
use crate::encoders::algorithms::radix::integer_to_digits;

/// Where a book stands in the library. Every component is 1-based.
///
/// Rooms are numbered without bound, so the room number is a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub room_index: String,
    pub wall_index_in_room: u32,
    pub shelf_index_in_wall: u32,
    pub book_index_in_shelf: u32,
}

impl Location {
    /// Breaks a book index into room, wall, shelf and book.
    pub fn from_index(index: &BigUint) -> Self {
        let (room, in_room) = index.div_rem(&BigUint::from(BOOKS_PER_ROOM));
        // remainder is below BOOKS_PER_ROOM
        let in_room = in_room.to_u32().unwrap_or_default();

        let wall = in_room / BOOKS_PER_WALL;
        let in_wall = in_room % BOOKS_PER_WALL;
        let shelf = in_wall / BOOKS_PER_SHELF;
        let book = in_wall % BOOKS_PER_SHELF;

        Location {
            room_index: integer_to_digits(&(room + BigUint::one()), &Alphabet::decimal()),
            wall_index_in_room: wall + 1,
            shelf_index_in_wall: shelf + 1,
            book_index_in_shelf: book + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "room {}, wall {}, shelf {}, book {}",
            self.room_index, self.wall_index_in_room, self.shelf_index_in_wall, self.book_index_in_shelf
        )
    }
}
