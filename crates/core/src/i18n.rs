//! Message catalog for validation and API errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::traits::Translator;

/// Supported message locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "id" => Ok(Locale::Id),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Id => f.write_str("id"),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("validation.invalid_courier", "The :attribute must be a valid courier code. Valid options are: :couriers"),
    ("validation.courier_not_found", "The selected :attribute is not supported."),
    ("validation.origin_required", "Origin district ID is required."),
    ("validation.origin_must_be_integer", "Origin district ID must be a valid integer."),
    ("validation.origin_must_be_positive", "Origin district ID must be a positive number."),
    ("validation.destination_required", "Destination district ID is required."),
    ("validation.destination_must_be_integer", "Destination district ID must be a valid integer."),
    ("validation.destination_must_be_positive", "Destination district ID must be a positive number."),
    ("validation.destination_must_be_different", "Destination must be different from origin."),
    ("validation.weight_required", "Package weight is required."),
    ("validation.weight_must_be_positive", "Package weight must be greater than 0 grams."),
    ("validation.weight_exceeds_limit", "Package weight cannot exceed 30,000 grams (30kg)."),
    ("validation.courier_required", "At least one courier must be selected."),
    ("validation.courier_minimum_selection", "At least one courier must be selected."),
    ("validation.courier_maximum_selection", "You can select maximum 5 couriers at once."),
    ("validation.sort_by_invalid", "Sort option must be either \"lowest\" or \"highest\"."),
    ("attributes.origin_id", "origin district"),
    ("attributes.destination_id", "destination district"),
    ("attributes.weight", "package weight"),
    ("attributes.courier", "courier"),
    ("attributes.sort_by", "sort option"),
    ("api.500", "An error occurred on the RajaOngkir server. Please try again later."),
    ("api.no_data", "The RajaOngkir server returned no data for this request."),
];

const ID: &[(&str, &str)] = &[
    ("validation.invalid_courier", ":attribute harus berupa kode kurir yang valid. Pilihan yang tersedia: :couriers"),
    ("validation.courier_not_found", ":attribute yang dipilih tidak didukung."),
    ("validation.origin_required", "ID distrik asal wajib diisi."),
    ("validation.origin_must_be_integer", "ID distrik asal harus berupa angka yang valid."),
    ("validation.origin_must_be_positive", "ID distrik asal harus berupa angka positif."),
    ("validation.destination_required", "ID distrik tujuan wajib diisi."),
    ("validation.destination_must_be_integer", "ID distrik tujuan harus berupa angka yang valid."),
    ("validation.destination_must_be_positive", "ID distrik tujuan harus berupa angka positif."),
    ("validation.destination_must_be_different", "Tujuan harus berbeda dengan asal."),
    ("validation.weight_required", "Berat paket wajib diisi."),
    ("validation.weight_must_be_positive", "Berat paket harus lebih dari 0 gram."),
    ("validation.weight_exceeds_limit", "Berat paket tidak boleh melebihi 30.000 gram (30kg)."),
    ("validation.courier_required", "Minimal satu kurir harus dipilih."),
    ("validation.courier_minimum_selection", "Minimal satu kurir harus dipilih."),
    ("validation.courier_maximum_selection", "Maksimal 5 kurir dapat dipilih sekaligus."),
    ("validation.sort_by_invalid", "Opsi sorting harus \"lowest\" atau \"highest\"."),
    ("attributes.origin_id", "distrik asal"),
    ("attributes.destination_id", "distrik tujuan"),
    ("attributes.weight", "berat paket"),
    ("attributes.courier", "kurir"),
    ("attributes.sort_by", "opsi sorting"),
    ("api.500", "Terjadi kesalahan pada server RajaOngkir. Silakan coba lagi nanti."),
    ("api.no_data", "Server RajaOngkir tidak mengembalikan data untuk permintaan ini."),
];

/// Built-in catalog with English and Indonesian messages.
///
/// Placeholders use the `:name` form. Unknown keys translate to the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self.locale {
            Locale::En => EN,
            Locale::Id => ID,
        }
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self
            .table()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key);

        // Longest names first so `:attribute` is not clobbered by a shorter `:attr`.
        let mut ordered: Vec<&(&str, &str)> = params.iter().collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut message = template.to_string();
        for (name, value) in ordered {
            message = message.replace(&format!(":{}", name), value);
        }
        message
    }
}
