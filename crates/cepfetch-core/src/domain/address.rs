use serde::{Deserialize, Serialize};

use crate::ProviderId;

/// Address as published by ViaCEP, in ViaCEP's own field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepAddress {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub unidade: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub estado: String,
    pub regiao: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
}

/// Address as published by BrasilAPI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrasilApiAddress {
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub service: String,
}

/// Winning payload of a lookup; serializes in the answering provider's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Address {
    ViaCep(ViaCepAddress),
    BrasilApi(BrasilApiAddress),
}

impl Address {
    pub const fn provider(&self) -> ProviderId {
        match self {
            Self::ViaCep(_) => ProviderId::ViaCep,
            Self::BrasilApi(_) => ProviderId::BrasilApi,
        }
    }

    pub fn postal_code(&self) -> &str {
        match self {
            Self::ViaCep(address) => &address.cep,
            Self::BrasilApi(address) => &address.cep,
        }
    }

    pub fn street(&self) -> &str {
        match self {
            Self::ViaCep(address) => &address.logradouro,
            Self::BrasilApi(address) => &address.street,
        }
    }

    pub fn city(&self) -> &str {
        match self {
            Self::ViaCep(address) => &address.localidade,
            Self::BrasilApi(address) => &address.city,
        }
    }

    /// Two-letter state code.
    pub fn state(&self) -> &str {
        match self {
            Self::ViaCep(address) => &address.uf,
            Self::BrasilApi(address) => &address.state,
        }
    }
}

impl From<ViaCepAddress> for Address {
    fn from(value: ViaCepAddress) -> Self {
        Self::ViaCep(value)
    }
}

impl From<BrasilApiAddress> for Address {
    fn from(value: BrasilApiAddress) -> Self {
        Self::BrasilApi(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_provider_field_names() {
        let address = Address::from(BrasilApiAddress {
            cep: String::from("01001000"),
            state: String::from("SP"),
            city: String::from("São Paulo"),
            neighborhood: String::from("Sé"),
            street: String::from("Praça da Sé"),
            service: String::from("open-cep"),
        });

        let value = serde_json::to_value(&address).expect("serializable");
        assert_eq!(value["neighborhood"], "Sé");
        assert_eq!(value["service"], "open-cep");
        assert!(value.get("BrasilApi").is_none(), "payload must not be tagged");
    }

    #[test]
    fn accessors_map_to_provider_fields() {
        let address = Address::from(ViaCepAddress {
            cep: String::from("01001-000"),
            logradouro: String::from("Praça da Sé"),
            localidade: String::from("São Paulo"),
            uf: String::from("SP"),
            ..ViaCepAddress::default()
        });

        assert_eq!(address.provider(), ProviderId::ViaCep);
        assert_eq!(address.postal_code(), "01001-000");
        assert_eq!(address.street(), "Praça da Sé");
        assert_eq!(address.city(), "São Paulo");
        assert_eq!(address.state(), "SP");
    }
}
