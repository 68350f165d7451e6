pub mod bindings;
pub mod clonecell;
pub mod copyhashmap;
pub mod errorfmt;
pub mod numcell;
