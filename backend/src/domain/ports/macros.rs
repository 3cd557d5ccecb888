//! `define_port_error!`: declares a port error enum with `thiserror` messages
//! and a snake_case constructor per variant.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Unavailable => "store unavailable",
//!         Query { message: String } => "query failed: {message}",
//!     }
//! }
//! let err = StoreError::query("timeout");
//! ```
//!
//! Constructor parameters take `impl Into<FieldType>` so `&str` works for
//! `String` fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                $crate::domain::ports::port_error_ctor!($variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

macro_rules! port_error_ctor {
    ($variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };
    ($variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;
pub(crate) use port_error_ctor;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePortError {
            Offline => "backend offline",
            Rejected { message: String } => "rejected: {message}",
            Throttled { message: String, retry_after: u32 } => "throttled: {message} ({retry_after}s)",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::offline().to_string(), "backend offline");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(SamplePortError::rejected("nope").to_string(), "rejected: nope");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::throttled("slow down", 5_u32);
        assert_eq!(err.to_string(), "throttled: slow down (5s)");
    }
}
