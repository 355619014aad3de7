use std::collections::HashSet;

use cinema_booking_api::seating::{
    MAX_SEATS_PER_BOOKING, SeatId, SeatMap, SeatSelection, SeatStatus, SeatTier, SeatType, SeatTypes,
    SeatingError, Toggle,
};

fn hall() -> SeatMap {
    SeatMap {
        rows: ["A", "B", "C", "D", "E", "F"].map(String::from).to_vec(),
        columns: 10,
        vip_rows: vec!["D".into(), "E".into()],
        couple_rows: vec!["F".into()],
        seat_types: SeatTypes {
            standard: SeatTier { price: 75_000 },
            vip: SeatTier { price: 100_000 },
            couple: Some(SeatTier { price: 180_000 }),
        },
    }
}

fn seat(label: &str) -> SeatId {
    label.parse().unwrap()
}

#[test]
fn labels_parse_case_insensitively() {
    assert_eq!(seat(" c7 "), SeatId::new("C", 7));
    assert_eq!(seat("AA12").to_string(), "AA12");

    for bad in ["", "7", "C", "C0", "7C", "C-1", "C7x"] {
        assert!(
            matches!(bad.parse::<SeatId>(), Err(SeatingError::InvalidSeatLabel(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn toggle_selects_then_deselects() {
    let map = hall();
    let occupied = HashSet::new();
    let mut selection = SeatSelection::new();

    assert_eq!(selection.toggle(&map, &occupied, seat("A1")).unwrap(), Toggle::Selected);
    assert!(selection.contains(&seat("A1")));
    assert_eq!(selection.toggle(&map, &occupied, seat("A1")).unwrap(), Toggle::Deselected);
    assert!(selection.is_empty());
}

#[test]
fn ninth_seat_is_rejected() {
    let map = hall();
    let occupied = HashSet::new();
    let mut selection = SeatSelection::new();
    for n in 1..=MAX_SEATS_PER_BOOKING as u16 {
        selection.toggle(&map, &occupied, SeatId::new("B", n)).unwrap();
    }

    let err = selection.toggle(&map, &occupied, seat("B9")).unwrap_err();
    assert_eq!(err, SeatingError::TooManySeats { max: 8 });
    assert_eq!(selection.len(), 8);

    // freeing one makes room again
    selection.toggle(&map, &occupied, seat("B1")).unwrap();
    assert_eq!(selection.toggle(&map, &occupied, seat("B9")).unwrap(), Toggle::Selected);
}

#[test]
fn occupied_seat_cannot_be_selected() {
    let map = hall();
    let occupied: HashSet<_> = [seat("C5")].into();
    let mut selection = SeatSelection::new();

    assert_eq!(
        selection.toggle(&map, &occupied, seat("C5")),
        Err(SeatingError::SeatOccupied("C5".into()))
    );
    assert!(selection.is_empty());
}

#[test]
fn seats_off_the_map_are_rejected() {
    let map = hall();
    let occupied = HashSet::new();
    let mut selection = SeatSelection::new();

    assert!(matches!(
        selection.toggle(&map, &occupied, seat("Z1")),
        Err(SeatingError::UnknownRow(_))
    ));
    assert!(matches!(
        selection.toggle(&map, &occupied, seat("A11")),
        Err(SeatingError::SeatOutOfRange(_))
    ));
}

#[test]
fn total_recomputes_on_add_and_remove() {
    let map = hall();
    let occupied = HashSet::new();
    let mut selection = SeatSelection::new();

    selection.toggle(&map, &occupied, seat("A1")).unwrap();
    assert_eq!(selection.quote(&map).unwrap().total, 75_000);

    selection.toggle(&map, &occupied, seat("D3")).unwrap();
    assert_eq!(selection.quote(&map).unwrap().total, 175_000);

    selection.toggle(&map, &occupied, seat("F2")).unwrap();
    let quote = selection.quote(&map).unwrap();
    assert_eq!(quote.total, 355_000);
    assert_eq!(quote.seats[2].seat_type, SeatType::Couple);

    selection.toggle(&map, &occupied, seat("D3")).unwrap();
    assert_eq!(selection.quote(&map).unwrap().total, 255_000);
}

#[test]
fn from_labels_rejects_duplicates_and_empty_requests() {
    let map = hall();
    let occupied = HashSet::new();

    assert_eq!(
        SeatSelection::from_labels(&map, &occupied, ["A1", "a1"]),
        Err(SeatingError::DuplicateSeat("A1".into()))
    );
    assert_eq!(
        SeatSelection::from_labels(&map, &occupied, Vec::<String>::new()),
        Err(SeatingError::NoSeatsSelected)
    );

    let selection = SeatSelection::from_labels(&map, &occupied, ["E5", "E6"]).unwrap();
    assert_eq!(selection.quote(&map).unwrap().total, 200_000);
}

#[test]
fn layout_marks_occupied_over_selected() {
    let map = hall();
    let occupied: HashSet<_> = [seat("A1"), seat("D4")].into();
    let selected: HashSet<_> = [seat("A1"), seat("A2")].into();

    let layout = map.layout(&occupied, &selected);
    assert_eq!(layout.capacity, 60);
    assert_eq!(layout.occupied, 2);
    assert_eq!(layout.available, 58);
    assert_eq!(layout.prices["vip"], 100_000);

    let row_a = &layout.rows[0];
    assert_eq!(row_a.seats[0].status, SeatStatus::Occupied);
    assert_eq!(row_a.seats[1].status, SeatStatus::Selected);
    assert_eq!(row_a.seats[2].status, SeatStatus::Available);
    assert_eq!(layout.rows[3].seat_type, SeatType::Vip);
}

#[test]
fn seat_map_validation() {
    assert!(hall().validate().is_ok());

    let mut map = hall();
    map.rows.clear();
    assert!(matches!(map.validate(), Err(SeatingError::InvalidSeatMap(_))));

    let mut map = hall();
    map.vip_rows.push("Q".into());
    assert!(map.validate().is_err());

    let mut map = hall();
    map.vip_rows.push("F".into());
    assert!(map.validate().is_err(), "a row cannot be vip and couple");

    let mut map = hall();
    map.seat_types.couple = None;
    assert!(map.validate().is_err(), "couple rows need a price");

    let mut map = hall();
    map.columns = 0;
    assert!(map.validate().is_err());
}
