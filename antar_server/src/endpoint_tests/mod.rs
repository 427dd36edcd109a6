mod estimate;
mod helpers;
mod mocks;
mod nearby;
mod orders;
