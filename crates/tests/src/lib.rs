pub mod fixtures;

#[cfg(test)]
mod metadata_tests;
#[cfg(test)]
mod status_tests;
#[cfg(test)]
mod user_tests;
