//! Seat maps, seat selection and per-seat pricing.
//!
//! Every endpoint that shows a hall, prices a selection or creates a booking goes
//! through this module, so a seat's type and price are decided in exactly one place.
//! The map's explicit `vip_rows` / `couple_rows` sets are authoritative; a row that
//! appears in neither is a standard row.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Upper bound on seats in a single booking.
pub const MAX_SEATS_PER_BOOKING: usize = 8;

/// Widest hall a seat map may describe.
pub const MAX_COLUMNS: u16 = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeatingError {
    #[error("invalid seat label '{0}'")]
    InvalidSeatLabel(String),

    #[error("row {0} does not exist in this hall")]
    UnknownRow(String),

    #[error("seat {0} is outside the hall")]
    SeatOutOfRange(String),

    #[error("seat {0} is already taken")]
    SeatOccupied(String),

    #[error("seat {0} was selected more than once")]
    DuplicateSeat(String),

    #[error("at most {max} seats can be booked at once")]
    TooManySeats { max: usize },

    #[error("select at least one seat")]
    NoSeatsSelected,

    #[error("invalid seat map: {0}")]
    InvalidSeatMap(String),
}

/// A seat address such as `C7`: one or more row letters followed by a 1-based number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId {
    pub row: String,
    pub number: u16,
}

impl SeatId {
    pub fn new(row: impl Into<String>, number: u16) -> Self {
        Self {
            row: row.into().to_ascii_uppercase(),
            number,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

impl FromStr for SeatId {
    type Err = SeatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeatingError::InvalidSeatLabel(s.to_string());
        let label = s.trim().to_ascii_uppercase();
        let split = label.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (row, number) = label.split_at(split);
        if row.is_empty() || !row.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u16 = number.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        Ok(SeatId {
            row: row.to_string(),
            number,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Standard,
    Vip,
    Couple,
}

impl SeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Standard => "standard",
            SeatType::Vip => "vip",
            SeatType::Couple => "couple",
        }
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Available,
    Occupied,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeatTier {
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeatTypes {
    pub standard: SeatTier,
    pub vip: SeatTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple: Option<SeatTier>,
}

/// Per-hall configuration: ordered rows, seats per row, premium row sets and prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeatMap {
    pub rows: Vec<String>,
    pub columns: u16,
    #[serde(default)]
    pub vip_rows: Vec<String>,
    #[serde(default)]
    pub couple_rows: Vec<String>,
    pub seat_types: SeatTypes,
}

impl SeatMap {
    pub fn validate(&self) -> Result<(), SeatingError> {
        let invalid = |msg: String| Err(SeatingError::InvalidSeatMap(msg));

        if self.rows.is_empty() {
            return invalid("at least one row is required".into());
        }
        if self.columns == 0 || self.columns > MAX_COLUMNS {
            return invalid(format!("columns must be between 1 and {MAX_COLUMNS}"));
        }

        let mut seen = HashSet::new();
        for row in &self.rows {
            if row.is_empty() || !row.chars().all(|c| c.is_ascii_uppercase()) {
                return invalid(format!("row '{row}' must be uppercase letters"));
            }
            if !seen.insert(row.as_str()) {
                return invalid(format!("row {row} is listed twice"));
            }
        }

        for row in self.vip_rows.iter().chain(&self.couple_rows) {
            if !seen.contains(row.as_str()) {
                return invalid(format!("premium row {row} is not one of the hall rows"));
            }
        }
        if let Some(row) = self.vip_rows.iter().find(|r| self.couple_rows.contains(r)) {
            return invalid(format!("row {row} cannot be both vip and couple"));
        }

        let tiers = [
            Some(&self.seat_types.standard),
            Some(&self.seat_types.vip),
            self.seat_types.couple.as_ref(),
        ];
        if tiers.iter().flatten().any(|tier| tier.price < 0) {
            return invalid("prices cannot be negative".into());
        }
        if !self.couple_rows.is_empty() && self.seat_types.couple.is_none() {
            return invalid("couple rows need a couple price".into());
        }

        Ok(())
    }

    /// Total number of seats in the hall.
    pub fn capacity(&self) -> usize {
        self.rows.len() * usize::from(self.columns)
    }

    /// Type of every seat in `row`, or `None` when the hall has no such row.
    pub fn seat_type(&self, row: &str) -> Option<SeatType> {
        if !self.rows.iter().any(|r| r == row) {
            return None;
        }
        let seat_type = if self.vip_rows.iter().any(|r| r == row) {
            SeatType::Vip
        } else if self.couple_rows.iter().any(|r| r == row) {
            SeatType::Couple
        } else {
            SeatType::Standard
        };
        Some(seat_type)
    }

    pub fn price_of(&self, seat_type: SeatType) -> i64 {
        match seat_type {
            SeatType::Standard => self.seat_types.standard.price,
            SeatType::Vip => self.seat_types.vip.price,
            SeatType::Couple => self
                .seat_types
                .couple
                .as_ref()
                .map_or(self.seat_types.standard.price, |tier| tier.price),
        }
    }

    /// Check that `seat` exists in this hall and attach its type and price.
    pub fn resolve(&self, seat: &SeatId) -> Result<PricedSeat, SeatingError> {
        let seat_type = self
            .seat_type(&seat.row)
            .ok_or_else(|| SeatingError::UnknownRow(seat.row.clone()))?;
        if seat.number == 0 || seat.number > self.columns {
            return Err(SeatingError::SeatOutOfRange(seat.label()));
        }
        Ok(PricedSeat {
            label: seat.label(),
            row: seat.row.clone(),
            number: seat.number,
            seat_type,
            price: self.price_of(seat_type),
        })
    }

    /// Render the hall row by row. An occupied seat stays occupied even if it also
    /// appears in `selected`.
    pub fn layout(&self, occupied: &HashSet<SeatId>, selected: &HashSet<SeatId>) -> SeatLayout {
        let mut occupied_count = 0;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let seat_type = self.seat_type(row).unwrap_or(SeatType::Standard);
                let price = self.price_of(seat_type);
                let seats = (1..=self.columns)
                    .map(|number| {
                        let id = SeatId::new(row.clone(), number);
                        let status = if occupied.contains(&id) {
                            occupied_count += 1;
                            SeatStatus::Occupied
                        } else if selected.contains(&id) {
                            SeatStatus::Selected
                        } else {
                            SeatStatus::Available
                        };
                        SeatCell {
                            label: id.label(),
                            number,
                            seat_type,
                            price,
                            status,
                        }
                    })
                    .collect();
                SeatRow {
                    row: row.clone(),
                    seat_type,
                    seats,
                }
            })
            .collect();

        let capacity = self.capacity();
        SeatLayout {
            rows,
            capacity,
            occupied: occupied_count,
            available: capacity - occupied_count,
            prices: self.price_list(),
        }
    }

    fn price_list(&self) -> BTreeMap<String, i64> {
        let mut prices = BTreeMap::new();
        prices.insert(SeatType::Standard.to_string(), self.seat_types.standard.price);
        prices.insert(SeatType::Vip.to_string(), self.seat_types.vip.price);
        if let Some(couple) = &self.seat_types.couple {
            prices.insert(SeatType::Couple.to_string(), couple.price);
        }
        prices
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PricedSeat {
    pub label: String,
    pub row: String,
    pub number: u16,
    pub seat_type: SeatType,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeatCell {
    pub label: String,
    pub number: u16,
    pub seat_type: SeatType,
    pub price: i64,
    pub status: SeatStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeatRow {
    pub row: String,
    pub seat_type: SeatType,
    pub seats: Vec<SeatCell>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeatLayout {
    pub rows: Vec<SeatRow>,
    pub capacity: usize,
    pub occupied: usize,
    pub available: usize,
    /// Price per seat type present in the hall, keyed by `standard` / `vip` / `couple`.
    pub prices: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceQuote {
    pub seats: Vec<PricedSeat>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Seats picked for one showtime, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatSelection {
    seats: Vec<SeatId>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from raw labels, as submitted in a booking request.
    pub fn from_labels<I, S>(
        map: &SeatMap,
        occupied: &HashSet<SeatId>,
        labels: I,
    ) -> Result<Self, SeatingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for label in labels {
            let seat: SeatId = label.as_ref().parse()?;
            if selection.contains(&seat) {
                return Err(SeatingError::DuplicateSeat(seat.label()));
            }
            selection.toggle(map, occupied, seat)?;
        }
        if selection.is_empty() {
            return Err(SeatingError::NoSeatsSelected);
        }
        Ok(selection)
    }

    /// Select `seat`, or deselect it if it is already selected.
    pub fn toggle(
        &mut self,
        map: &SeatMap,
        occupied: &HashSet<SeatId>,
        seat: SeatId,
    ) -> Result<Toggle, SeatingError> {
        if let Some(pos) = self.seats.iter().position(|s| *s == seat) {
            self.seats.remove(pos);
            return Ok(Toggle::Deselected);
        }

        map.resolve(&seat)?;
        if occupied.contains(&seat) {
            return Err(SeatingError::SeatOccupied(seat.label()));
        }
        if self.seats.len() >= MAX_SEATS_PER_BOOKING {
            return Err(SeatingError::TooManySeats {
                max: MAX_SEATS_PER_BOOKING,
            });
        }

        self.seats.push(seat);
        Ok(Toggle::Selected)
    }

    pub fn seats(&self) -> &[SeatId] {
        &self.seats
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats.contains(seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Price every selected seat against `map`.
    pub fn quote(&self, map: &SeatMap) -> Result<PriceQuote, SeatingError> {
        let seats = self
            .seats
            .iter()
            .map(|seat| map.resolve(seat))
            .collect::<Result<Vec<_>, _>>()?;
        let total = seats.iter().map(|seat| seat.price).sum();
        Ok(PriceQuote { seats, total })
    }
}
