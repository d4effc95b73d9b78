//! Reference CSV inputs.

/// Four people: John and Johnny share an email, John and Jonathan share a phone.
pub const PEOPLE_CSV: &str = "\
FirstName,LastName,Phone,Email,Zip
John,Doe,123-456-7890,john@example.com,12345
Jane,Smith,987-654-3210,ane@example.com,54321
Johnny,Doe,555-555-5555,john@example.com,12345
Jonathan,Doe,(123) 456-7890,jonathan@example.com,67890
";

/// Header only.
pub const HEADER_ONLY_CSV: &str = "FirstName,LastName,Phone,Email,Zip\n";

/// No email or phone columns at all.
pub const NO_IDENTIFIER_COLUMNS_CSV: &str = "\
FirstName,LastName,Address,Zip
John,Doe,123 Main St,12345
Jane,Smith,456 Oak Ave,54321
";

/// The same number in four spellings, one with a leading country code.
pub const PHONE_FORMATS_CSV: &str = "\
FirstName,LastName,Phone
John,Doe,123-456-7890
Jane,Smith,(123) 456-7890
Bob,Johnson,1234567890
Alice,Brown,1-123-456-7890
";

/// Emails differing only in case.
pub const EMAIL_CASE_CSV: &str = "\
FirstName,LastName,Email
John,Doe,John@Example.com
Jane,Smith,john@example.com
";

/// Several phone and email columns on one row.
pub const MULTI_COLUMN_CSV: &str = "\
FirstName,LastName,WorkPhone,HomePhone,PersonalEmail,WorkEmail
John,Doe,123-456-7890,987-654-3210,john@example.com,john@work.com
";

/// Blank identifiers that must not group rows together.
pub const BLANK_VALUES_CSV: &str = "\
FirstName,LastName,Phone,Email
John,Doe,,john@example.com
Jane,Smith,123-456-7890,
Bob,Johnson,,
";
