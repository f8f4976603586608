mod token;

pub use token::TokenAuth;
