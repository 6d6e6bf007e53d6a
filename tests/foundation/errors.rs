//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use edmview_foundation::{
    CaloHitId, ContributionId, EntityKind, Error, ErrorKind, LinkTable, ParticleId,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_not_found() {
    let err = Error::not_found(ParticleId::new(12), 10);
    assert!(err.is_not_found());
    assert!(matches!(
        err.kind,
        ErrorKind::NotFound {
            kind: EntityKind::Particle,
            index: 12,
            len: 10
        }
    ));
    let msg = format!("{err}");
    assert!(msg.contains("particle 12"));
    assert!(msg.contains("10 rows"));
}

#[test]
fn error_range() {
    let err = Error::range(LinkTable::Daughters, 4, 2, 8);
    assert!(err.is_range());
    assert!(!err.is_not_found());
    assert!(format!("{err}").contains("daughters range [4, 2)"));
}

#[test]
fn error_orphaned() {
    let err = Error::orphaned(ContributionId::new(3));
    assert!(err.is_orphaned());
    assert!(format!("{err}").contains("calo contribution 3"));
}

#[test]
fn error_misaligned() {
    let err = Error::misaligned("particles", "mass", 5, 4);
    let msg = format!("{err}");
    assert!(msg.contains("particles.mass"));
    assert!(msg.contains("expected 5"));
}

#[test]
fn error_invalid_config() {
    let err = Error::invalid_config("bad tolerance");
    assert!(matches!(err.kind, ErrorKind::InvalidConfig(_)));
    assert!(format!("{err}").contains("bad tolerance"));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn error_context_is_appended() {
    let err = Error::range(LinkTable::Contributions, 0, 9, 4)
        .with_context(CaloHitId::new(2).to_string());
    assert_eq!(err.context.as_deref(), Some("calo hit 2"));
    assert!(format!("{err}").ends_with("(while resolving calo hit 2)"));
}

#[test]
fn error_without_context_has_no_suffix() {
    let err = Error::not_found(ParticleId::new(0), 0);
    assert!(!format!("{err}").contains("while resolving"));
}

#[test]
fn errors_are_comparable() {
    assert_eq!(
        Error::not_found(ParticleId::new(1), 1),
        Error::not_found(ParticleId::new(1), 1)
    );
    assert_ne!(
        Error::not_found(ParticleId::new(1), 1),
        Error::orphaned(ParticleId::new(1))
    );
}
