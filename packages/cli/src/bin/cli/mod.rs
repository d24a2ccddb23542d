pub mod episodes;
