use bon::Builder;
use const_oid::ObjectIdentifier;
use der::{Tag, Tagged};
use der::asn1::{Any, SetOfVec};
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::{ExtendedKeyUsageOption, KeyUsage, SubjectAltName};
use crate::error::{CertError, Result};
use crate::key::PublicKey;

/// Parameters for building an X.509 certificate.
///
/// This struct contains the subject, public key, and requested extensions for the certificate.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `usages` - A list of extended key usage options.
/// * `key_usage` - The key usage bits; omitted from the certificate when empty.
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `subject_alt_name` - DNS names and IP addresses; omitted when empty.
#[derive(Clone, Debug, Builder)]
pub struct CertificationRequestInfo {
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub key_usage: KeyUsage,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default)]
    pub subject_alt_name: SubjectAltName,
}

/// Distinguished name parameters for building an X.509 certificate.
///
/// Empty or absent attributes are left out of the encoded name.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    #[builder(default)]
    pub common_name: String,
    pub organization: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 name: `O` first, then `CN`, as UTF8Strings.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::Name> {
        let mut rdns = Vec::new();
        if let Some(organization) = self.organization.as_deref().filter(|o| !o.is_empty()) {
            rdns.push(single_attribute_rdn(
                const_oid::db::rfc4519::O,
                organization,
            )?);
        }
        if !self.common_name.is_empty() {
            rdns.push(single_attribute_rdn(
                const_oid::db::rfc4519::CN,
                &self.common_name,
            )?);
        }
        Ok(RdnSequence(rdns))
    }

    /// Reads the common name and organization out of an X.509 name.
    ///
    /// Attributes that are not UTF8String, PrintableString or IA5String are skipped.
    pub fn from_x509_name(x509dn: &x509_cert::name::Name) -> Self {
        let mut dn = DistinguishedName::default();
        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = attribute_string(&attr.value) else {
                    continue;
                };
                if attr.oid == const_oid::db::rfc4519::CN {
                    dn.common_name = value;
                } else if attr.oid == const_oid::db::rfc4519::O {
                    dn.organization = Some(value);
                }
            }
        }
        dn
    }
}

fn single_attribute_rdn(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName> {
    let attribute = AttributeTypeAndValue {
        oid,
        value: Any::new(Tag::Utf8String, value.as_bytes())?,
    };
    Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![
        attribute,
    ])?))
}

fn attribute_string(value: &Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String => {
            std::str::from_utf8(value.value()).ok().map(str::to_owned)
        }
        _ => None,
    }
}

/// Certificate validity period.
///
/// This struct represents the `notBefore` and `notAfter` fields in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A validity period starting now and ending `years` calendar years later.
    ///
    /// The start is truncated to whole seconds, the resolution of certificate times.
    pub fn for_years(years: i32) -> Result<Self> {
        let now = OffsetDateTime::now_utc()
            .replace_nanosecond(0)
            .map_err(|e| CertError::InvalidInput(e.to_string()))?;
        Self::starting_at(now, years)
    }

    /// A validity period from `not_before` to the same instant `years` calendar years later.
    ///
    /// A 29 February start with no counterpart in the target year rolls over to 1 March.
    pub fn starting_at(not_before: OffsetDateTime, years: i32) -> Result<Self> {
        let target_year = not_before.year() + years;
        let not_after = match not_before.replace_year(target_year) {
            Ok(end) => end,
            Err(_) => not_before
                .replace_day(28)
                .and_then(|d| d.replace_year(target_year))
                .map(|d| d + Duration::days(1))
                .map_err(|e| CertError::InvalidInput(format!("validity out of range: {e}")))?,
        };
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

/// Represents an X.509 extension.
///
/// This struct contains the OID, criticality, and value of an extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: &E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_distinguished_name_roundtrip() {
        let dn = DistinguishedName::builder()
            .common_name("node1".to_string())
            .organization("Acme, Inc.".to_string())
            .build();
        let name = dn.as_x509_name().unwrap();
        assert_eq!(name.0.len(), 2);
        assert_eq!(name.0[0].0.get(0).unwrap().oid, const_oid::db::rfc4519::O);
        assert_eq!(DistinguishedName::from_x509_name(&name), dn);
    }

    #[test]
    fn test_empty_common_name_is_omitted() {
        let dn = DistinguishedName::builder()
            .organization("Acme".to_string())
            .build();
        let name = dn.as_x509_name().unwrap();
        assert_eq!(name.0.len(), 1);
        assert_eq!(DistinguishedName::from_x509_name(&name).common_name, "");
    }

    #[test]
    fn test_validity_is_ten_calendar_years() {
        let start = datetime!(2024-03-15 10:20:30 UTC);
        let validity = Validity::starting_at(start, 10).unwrap();
        assert_eq!(validity.not_after, datetime!(2034-03-15 10:20:30 UTC));
    }

    #[test]
    fn test_validity_from_leap_day_rolls_to_march() {
        let start = datetime!(2024-02-29 00:00:00 UTC);
        let validity = Validity::starting_at(start, 10).unwrap();
        assert_eq!(validity.not_after, datetime!(2034-03-01 00:00:00 UTC));
    }

    #[test]
    fn test_for_years_has_whole_seconds() {
        let validity = Validity::for_years(10).unwrap();
        assert_eq!(validity.not_before.nanosecond(), 0);
        assert_eq!(validity.not_after.year(), validity.not_before.year() + 10);
    }
}
