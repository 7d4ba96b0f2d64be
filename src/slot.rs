// Axel '0vercl0k' Souchet - October 19 2026
//! Declaration helpers for the unions that only rename a member.
//!
//! A lot of slots in the blocks went through several names over the years
//! without ever changing type (`SparePtr1` -> `AtlThunkSListPtr`, ...). Those
//! unions are all the same shape: every alternative is a pointer (or a
//! `u32`), so reading any of them is always sound.

/// Declare a union whose alternatives are all pointer-sized.
macro_rules! pointer_union {
    ($(#[$meta:meta])* $name:ident { $first:ident $(, $rest:ident)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        #[repr(C)]
        pub union $name<A: $crate::arch::Arch> {
            pub $first: A::Ptr,
            $(pub $rest: A::Ptr,)*
        }

        impl<A: $crate::arch::Arch> $name<A> {
            pub fn get(&self) -> A::Ptr {
                // SAFETY: every alternative has the same type.
                unsafe { self.$first }
            }

            pub fn set(&mut self, value: A::Ptr) {
                self.$first = value;
            }
        }

        impl<A: $crate::arch::Arch> ::std::fmt::Debug for $name<A> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&self.get(), f)
            }
        }
    };
}

/// Declare a union whose alternatives all share one scalar type.
macro_rules! scalar_union {
    ($(#[$meta:meta])* $name:ident: $ty:ty { $first:ident $(, $rest:ident)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        #[repr(C)]
        pub union $name {
            pub $first: $ty,
            $(pub $rest: $ty,)*
        }

        impl $name {
            pub fn get(&self) -> $ty {
                // SAFETY: every alternative has the same type.
                unsafe { self.$first }
            }

            pub fn set(&mut self, value: $ty) {
                self.$first = value;
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{:#x}", self.get())
            }
        }
    };
}
