//! Cost request validation and normalization.
//!
//! [`CostValidator`] checks a [`RawCostRequest`] against the API's limits and
//! either returns a normalized [`CostRequest`] or every field error it found.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::courier::{self, Courier};
use crate::traits::Translator;
use crate::types::{CostRequest, LocationId, LocationScope, RawCostRequest, SortBy};

/// Heaviest parcel the API accepts, in grams.
pub const MAX_WEIGHT_GRAMS: i64 = 30_000;

/// Most couriers that can be quoted in one request.
pub const MAX_COURIERS: usize = 5;

/// Stable identifier of a failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    OriginRequired,
    OriginMustBeInteger,
    OriginMustBePositive,
    DestinationRequired,
    DestinationMustBeInteger,
    DestinationMustBePositive,
    DestinationMustBeDifferent,
    WeightRequired,
    WeightMustBePositive,
    WeightExceedsLimit,
    CourierRequired,
    CourierMinimumSelection,
    CourierMaximumSelection,
    InvalidCourier,
    SortByInvalid,
}

impl ValidationCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ValidationCode::OriginRequired => "origin_required",
            ValidationCode::OriginMustBeInteger => "origin_must_be_integer",
            ValidationCode::OriginMustBePositive => "origin_must_be_positive",
            ValidationCode::DestinationRequired => "destination_required",
            ValidationCode::DestinationMustBeInteger => "destination_must_be_integer",
            ValidationCode::DestinationMustBePositive => "destination_must_be_positive",
            ValidationCode::DestinationMustBeDifferent => "destination_must_be_different",
            ValidationCode::WeightRequired => "weight_required",
            ValidationCode::WeightMustBePositive => "weight_must_be_positive",
            ValidationCode::WeightExceedsLimit => "weight_exceeds_limit",
            ValidationCode::CourierRequired => "courier_required",
            ValidationCode::CourierMinimumSelection => "courier_minimum_selection",
            ValidationCode::CourierMaximumSelection => "courier_maximum_selection",
            ValidationCode::InvalidCourier => "invalid_courier",
            ValidationCode::SortByInvalid => "sort_by_invalid",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Input field, e.g. `weight` or `courier.2`.
    pub field: String,
    pub code: ValidationCode,
    /// Localized message. Branch on `code`, not on this text.
    pub message: String,
}

/// Every error found in one request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failed codes in evaluation order.
    pub fn codes(&self) -> Vec<ValidationCode> {
        self.0.iter().map(|e| e.code).collect()
    }

    pub fn contains(&self, code: ValidationCode) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    /// Errors reported against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.0.iter().filter(move |e| e.field == field)
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join(" "))
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Copy)]
enum Side {
    Origin,
    Destination,
}

impl Side {
    fn field(self) -> &'static str {
        match self {
            Side::Origin => "origin_id",
            Side::Destination => "destination_id",
        }
    }

    fn required(self) -> ValidationCode {
        match self {
            Side::Origin => ValidationCode::OriginRequired,
            Side::Destination => ValidationCode::DestinationRequired,
        }
    }

    fn must_be_integer(self) -> ValidationCode {
        match self {
            Side::Origin => ValidationCode::OriginMustBeInteger,
            Side::Destination => ValidationCode::DestinationMustBeInteger,
        }
    }

    fn must_be_positive(self) -> ValidationCode {
        match self {
            Side::Origin => ValidationCode::OriginMustBePositive,
            Side::Destination => ValidationCode::DestinationMustBePositive,
        }
    }
}

/// Validator for one [`LocationScope`].
#[derive(Clone)]
pub struct CostValidator {
    scope: LocationScope,
    translator: Arc<dyn Translator>,
}

impl CostValidator {
    pub fn new(scope: LocationScope, translator: Arc<dyn Translator>) -> Self {
        Self { scope, translator }
    }

    pub fn scope(&self) -> LocationScope {
        self.scope
    }

    /// Check every rule and collect all failures.
    pub fn validate(&self, raw: &RawCostRequest) -> Result<CostRequest, ValidationErrors> {
        let mut errors = Vec::new();

        let origin = self.check_location(raw.origin.as_ref(), Side::Origin, &mut errors);
        let destination = self.check_location(raw.destination.as_ref(), Side::Destination, &mut errors);

        if let (Some(o), Some(d)) = (raw.origin.as_ref(), raw.destination.as_ref()) {
            if !o.is_blank() && !d.is_blank() && same_location(o, d) {
                self.push(&mut errors, "destination_id", ValidationCode::DestinationMustBeDifferent);
            }
        }

        let weight = self.check_weight(raw.weight, &mut errors);
        let couriers = self.check_couriers(raw.couriers.as_deref(), &mut errors);
        let sort_by = self.check_sort_by(raw.sort_by.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        match (origin, destination, weight, couriers) {
            (Some(origin), Some(destination), Some(weight), Some(couriers)) => Ok(CostRequest {
                origin,
                destination,
                weight,
                couriers,
                sort_by,
            }),
            // Every None above pushed an error, so this arm is unreachable in practice.
            _ => Err(ValidationErrors(errors)),
        }
    }

    fn check_location(
        &self,
        value: Option<&LocationId>,
        side: Side,
        errors: &mut Vec<ValidationError>,
    ) -> Option<LocationId> {
        let value = match value {
            Some(v) if !v.is_blank() => v,
            _ => {
                self.push(errors, side.field(), side.required());
                return None;
            }
        };

        match (value.as_integer(), self.scope) {
            (Some(n), _) if n < 1 => {
                self.push(errors, side.field(), side.must_be_positive());
                None
            }
            (Some(n), _) => Some(LocationId::Numeric(n)),
            (None, LocationScope::Domestic) => {
                self.push(errors, side.field(), side.must_be_integer());
                None
            }
            (None, LocationScope::International) => {
                Some(LocationId::Code(value.to_string().trim().to_string()))
            }
        }
    }

    fn check_weight(&self, weight: Option<i64>, errors: &mut Vec<ValidationError>) -> Option<u32> {
        match weight {
            None => {
                self.push(errors, "weight", ValidationCode::WeightRequired);
                None
            }
            Some(w) if w < 1 => {
                self.push(errors, "weight", ValidationCode::WeightMustBePositive);
                None
            }
            Some(w) if w > MAX_WEIGHT_GRAMS => {
                self.push(errors, "weight", ValidationCode::WeightExceedsLimit);
                None
            }
            Some(w) => u32::try_from(w).ok(),
        }
    }

    fn check_couriers(&self, couriers: Option<&[String]>, errors: &mut Vec<ValidationError>) -> Option<Vec<Courier>> {
        let couriers = match couriers {
            Some(c) => c,
            None => {
                self.push(errors, "courier", ValidationCode::CourierRequired);
                return None;
            }
        };

        let before = errors.len();
        if couriers.is_empty() {
            self.push(errors, "courier", ValidationCode::CourierMinimumSelection);
        } else if couriers.len() > MAX_COURIERS {
            self.push(errors, "courier", ValidationCode::CourierMaximumSelection);
        }

        let mut parsed = Vec::with_capacity(couriers.len());
        for (index, code) in couriers.iter().enumerate() {
            match Courier::parse(code) {
                Some(c) => parsed.push(c),
                None => self.push(errors, &format!("courier.{}", index), ValidationCode::InvalidCourier),
            }
        }

        if errors.len() > before {
            return None;
        }

        parsed.sort_by_key(|c| c.code());
        parsed.dedup();
        Some(parsed)
    }

    fn check_sort_by(&self, sort_by: Option<&str>, errors: &mut Vec<ValidationError>) -> SortBy {
        match sort_by {
            None => SortBy::default(),
            Some(s) => s.parse().unwrap_or_else(|_| {
                self.push(errors, "sort_by", ValidationCode::SortByInvalid);
                SortBy::default()
            }),
        }
    }

    fn push(&self, errors: &mut Vec<ValidationError>, field: &str, code: ValidationCode) {
        let base = field.split('.').next().unwrap_or(field);
        let attribute = self.translator.translate(&format!("attributes.{}", base), &[]);
        let valid = courier::all_codes().join(", ");
        let message = self.translator.translate(
            &format!("validation.{}", code.as_str()),
            &[("attribute", attribute.as_str()), ("couriers", valid.as_str())],
        );
        errors.push(ValidationError {
            field: field.to_string(),
            code,
            message,
        });
    }
}

fn same_location(a: &LocationId, b: &LocationId) -> bool {
    match (a.as_integer(), b.as_integer()) {
        (Some(x), Some(y)) => x == y,
        _ => a.to_string().trim() == b.to_string().trim(),
    }
}
