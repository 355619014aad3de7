use cinema_booking_api::routes::params::{MAX_PAGE, Pagination};

#[test]
fn defaults_and_clamping() {
    assert_eq!(Pagination::default().normalize(), (1, 12, 0));

    let p = Pagination { page: Some(3), per_page: Some(10) };
    assert_eq!(p.normalize(), (3, 10, 20));

    let p = Pagination { page: Some(-4), per_page: Some(0) };
    assert_eq!(p.normalize(), (1, 1, 0));

    let p = Pagination { page: Some(2), per_page: Some(5_000) };
    assert_eq!(p.normalize(), (2, 100, 100));
}

#[test]
fn huge_page_numbers_do_not_overflow() {
    let p = Pagination { page: Some(i64::MAX), per_page: Some(100) };
    let (page, per_page, offset) = p.normalize();
    assert_eq!(page, MAX_PAGE);
    assert_eq!(per_page, 100);
    assert_eq!(offset, (MAX_PAGE - 1) * 100);
    assert!(offset >= 0);
}
