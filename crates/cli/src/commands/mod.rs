mod check;
mod decompose;
mod infer;

pub(crate) use check::cmd_check;
pub(crate) use decompose::cmd_decompose;
pub(crate) use infer::cmd_infer;
