//! Reference tables used by service channels
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use ptv_translation::reference_type;

reference_type!(
    /// Kinds of localized names
    NameType => "NameType"
);

reference_type!(
    /// Kinds of localized descriptions
    DescriptionType => "DescriptionType"
);

reference_type!(
    /// Kinds of phone numbers
    PhoneNumberType => "PhoneNumberType"
);

reference_type!(
    /// Visiting or postal address
    AddressCharacter => "AddressCharacter"
);

/// Stable codes of the rows the translators rely on
pub mod codes {
    pub const NAME: &str = "Name";
    pub const ALTERNATE_NAME: &str = "AlternateName";

    pub const DESCRIPTION: &str = "Description";
    pub const SHORT_DESCRIPTION: &str = "ShortDescription";

    pub const PHONE: &str = "Phone";
    pub const SMS: &str = "Sms";
    pub const FAX: &str = "Fax";

    pub const VISITING: &str = "Visiting";
    pub const POSTAL: &str = "Postal";
}
