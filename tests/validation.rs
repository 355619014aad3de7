use cinema_booking_api::{
    dto::{
        auth::RegisterRequest,
        bookings::CreateBookingRequest,
        users::UpdateProfileRequest,
    },
    error::AppError,
    validation::validated,
};
use uuid::Uuid;
use validator::Validate;

fn register() -> RegisterRequest {
    RegisterRequest {
        full_name: "Linh Pham".into(),
        email: "linh@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        phone: "0912345678".into(),
    }
}

fn failing_fields(req: &impl Validate) -> Vec<String> {
    let errors = req.validate().unwrap_err();
    let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
    fields.sort();
    fields
}

#[test]
fn valid_registration_passes() {
    assert!(register().validate().is_ok());
}

#[test]
fn mismatched_passwords_are_rejected() {
    let req = RegisterRequest {
        confirm_password: "secret2".into(),
        ..register()
    };
    assert_eq!(failing_fields(&req), vec!["confirm_password"]);
}

#[test]
fn phone_must_be_exactly_ten_digits() {
    for phone in ["091234567", "09123456789", "09123abc78", "+841234567"] {
        let req = RegisterRequest {
            phone: phone.into(),
            ..register()
        };
        assert_eq!(failing_fields(&req), vec!["phone"], "{phone}");
    }
}

#[test]
fn empty_required_fields_are_rejected() {
    let req = RegisterRequest {
        full_name: "   ".into(),
        email: "".into(),
        password: "".into(),
        confirm_password: "".into(),
        phone: "".into(),
    };
    assert_eq!(failing_fields(&req), vec!["email", "full_name", "password", "phone"]);
}

#[test]
fn normalized_registration_lowercases_email() {
    let req = RegisterRequest {
        email: "  Linh@Example.COM ".into(),
        full_name: " Linh ".into(),
        ..register()
    }
    .normalized();
    assert_eq!(req.email, "linh@example.com");
    assert_eq!(req.full_name, "Linh");
    assert!(req.validate().is_ok());
}

#[test]
fn booking_request_limits_seat_count() {
    let too_many = CreateBookingRequest {
        showtime_id: Uuid::new_v4(),
        seats: (1..=9).map(|n| format!("A{n}")).collect(),
        idempotency_key: None,
    };
    assert!(matches!(validated(too_many), Err(AppError::Validation(_))));

    let none = CreateBookingRequest {
        showtime_id: Uuid::new_v4(),
        seats: vec![],
        idempotency_key: None,
    };
    assert!(none.validate().is_err());
}

#[test]
fn profile_update_checks_only_present_fields() {
    let empty = UpdateProfileRequest {
        full_name: None,
        phone: None,
    };
    assert!(empty.validate().is_ok());

    let bad_phone = UpdateProfileRequest {
        full_name: None,
        phone: Some("123".into()),
    };
    assert_eq!(failing_fields(&bad_phone), vec!["phone"]);
}
