pub mod climatology;

pub use climatology::ClimatologyProvider;
