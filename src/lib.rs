//! Dataset indexing and encoding for CLEVR and Sort-of-CLEVR.
//!
//! Build a CLEVR index once with
//! [`BuildIndexUseCase`](application::build_index_use_case::BuildIndexUseCase),
//! then open splits through [`ClevrDataset`](data::clevr_dataset::ClevrDataset)
//! or [`SortOfClevrDataset`](data::sort_of_clevr::SortOfClevrDataset), directly
//! or through the burn loaders in [`data::dataloaders`].

pub mod application;
pub mod data;
pub mod domain;
pub mod infra;
