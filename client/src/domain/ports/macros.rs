//! Helper macro for generating driven-port error enums.
//!
//! Each variant gets a snake-case constructor whose parameters accept
//! `impl Into<T>`, so adapters can write `Error::timeout("...")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
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
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the generated constructors.
    use rstest::rstest;

    define_port_error! {
        pub enum SampleLookupError {
            Missing => "nothing there",
            Refused { message: String } => "refused: {message}",
            Throttled { attempts: u32 } => "throttled after {attempts} attempts",
            Conflict { message: String, request_id: u64 } => "conflict on {request_id}: {message}",
        }
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SampleLookupError::missing(), SampleLookupError::Missing);
        assert_eq!(SampleLookupError::missing().to_string(), "nothing there");
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = SampleLookupError::refused("token expired");
        assert_eq!(err.to_string(), "refused: token expired");
    }

    #[rstest]
    fn non_string_fields_keep_their_type() {
        let err = SampleLookupError::throttled(3_u32);
        assert_eq!(err.to_string(), "throttled after 3 attempts");
    }

    #[rstest]
    fn mixed_fields_follow_declaration_order() {
        let err = SampleLookupError::conflict("already accepted", 12_u64);
        assert_eq!(err.to_string(), "conflict on 12: already accepted");
    }
}
