use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = BudgetEntryId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = CashAccountId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = PaymentId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = ActualTransactionId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(ProjectId::from_str("invalid").is_err());
}

#[test]
fn test_derived_id_is_stable() {
    let parent = BudgetEntryId::new();
    assert_eq!(parent.derive("vat"), parent.derive("vat"));
    assert_ne!(parent.derive("vat"), parent.derive("other"));
    assert_ne!(parent.derive("vat"), parent);
}

#[test]
fn test_derived_id_depends_on_parent() {
    let a = BudgetEntryId::new();
    let b = BudgetEntryId::new();
    assert_ne!(a.derive("vat"), b.derive("vat"));
}
