//! DOM exceptions surfaced to API callers.

use thiserror::Error;

/// [§ 2.1 Exceptions](https://webidl.spec.whatwg.org/#idl-DOMException-error-names)
///
/// Errors raised by tree mutation and range operations. These represent
/// misuse of the API (an illegal node kind at a boundary, an offset past
/// the end of a node), never malformed markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// "The supplied node is incorrect or has an incorrect ancestor for this operation."
    #[error("InvalidNodeTypeError: {0}")]
    InvalidNodeType(&'static str),

    /// "The index is not in the allowed range."
    #[error("IndexSizeError: offset {offset} exceeds node length {length}")]
    IndexSize {
        /// The offending offset.
        offset: usize,
        /// Length of the node the offset was applied to.
        length: usize,
    },

    /// "The operation would yield an incorrect node tree."
    #[error("HierarchyRequestError: {0}")]
    HierarchyRequest(&'static str),

    /// "The object is in the wrong document."
    #[error("WrongDocumentError: boundary points belong to different trees")]
    WrongDocument,

    /// "The object is in an invalid state."
    #[error("InvalidStateError: {0}")]
    InvalidState(&'static str),

    /// "The object can not be found here."
    #[error("NotFoundError: {0}")]
    NotFound(&'static str),

    /// "The operation is not supported."
    #[error("NotSupportedError: {0}")]
    NotSupported(&'static str),
}
