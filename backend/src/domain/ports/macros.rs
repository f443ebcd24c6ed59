//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor that
//! accepts `impl Into<_>` for every field. An optional trailing
//! `transient: A, B` clause implements [`Transient`](crate::domain::Transient)
//! so services can retry those variants.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
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
            #[doc = "Construct the `" $variant "` variant."]
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
        $( transient: $($transient:ident),+ $(,)? )?
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

        $(
            impl $crate::domain::Transient for $name {
                fn is_transient(&self) -> bool {
                    matches!(self, $( Self::$transient { .. } )|+)
                }
            }
        )?
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::Transient;

    define_port_error! {
        pub enum ExamplePortError {
            Timeout => "timed out",
            Busy { message: String } => "busy: {message}",
            Rejected { code: u32 } => "rejected: {code}",
        }
        transient: Timeout, Busy
    }

    define_port_error! {
        pub enum PlainPortError {
            Mixed { message: String, count: u32 } => "mixed: {message} ({count})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::busy("pool exhausted");
        assert_eq!(err.to_string(), "busy: pool exhausted");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = PlainPortError::mixed("hello", 42_u32);
        assert_eq!(err.to_string(), "mixed: hello (42)");
    }

    #[test]
    fn transient_clause_classifies_variants() {
        assert!(ExamplePortError::timeout().is_transient());
        assert!(ExamplePortError::busy("x").is_transient());
        assert!(!ExamplePortError::rejected(7_u32).is_transient());
    }
}
