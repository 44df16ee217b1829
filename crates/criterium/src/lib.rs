//! # Criterium
//!
//! Build queries for hierarchical content repositories out of criteria
//! objects instead of string concatenation.
//!
//! Start with [`Criteria::builder`], add restrictions from
//! [`restrictions`], and hand the result to a [`Session`] over an
//! [`Executor`]. The same criteria compile to either query language of a
//! JCR repository.
//!
//! ## Query Languages
//!
//! | Feature | Language | Notes |
//! | ------- | -------- | ----- |
//! | `sql2` | JCR-SQL2 | The default when no language is named |
//! | `xpath` | XPath | Descendant-of must be expressible as the path scope |
//!
//! Use the `full` feature to enable both.
//!
//! ## Quick Start
//!
//! ```rust
//! use criterium::{Criteria, MatchMode, MemoryRepository, QueryLanguage, Row, Session};
//! use criterium::restrictions::{attr, like};
//!
//! let repository = MemoryRepository::new();
//! let path = repository.add_node("/", "hello")?;
//! repository.set_property(&path, "title", "a1")?;
//!
//! let criteria = Criteria::builder()
//!     .language(QueryLanguage::XPath)
//!     .add(like(attr("title")?, "a", MatchMode::Start)?)
//!     .build();
//!
//! let executor = repository.executor();
//! let session = Session::new(&executor);
//! assert_eq!(session.compile(&criteria)?.statement(), "//*[jcr:like(@title, 'a%')]");
//!
//! let result = session.execute(&criteria)?;
//! let paths: Vec<String> = result
//!     .items(|row| row.path().to_string())?
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(paths, ["/hello"]);
//! assert_eq!(result.total_size()?, 1);
//! # Ok::<(), criterium::Error>(())
//! ```

// The query API
pub use criterium_engine::{Compiler, Config, Criteria, CriteriaBuilder, Session};

// The condition model
pub use criterium_core::criterion::restrictions;
pub use criterium_core::{
    CompareOp, Criterion, Direction, Junction, JunctionKind, MatchMode, Order, OrderKey,
    OrderSpec, Property,
};

// Execution
pub use criterium_core::{
    Cursor, Executor, MemoryExecutor, MemoryRepository, PagedResult, QueryDescriptor, Row,
};

// Text generation, for callers that render without a session
pub use criterium_adapters::{RenderRequest, Renderer, renderer};

pub use criterium_common::types::{QueryLanguage, Value};
pub use criterium_common::utils::error::{Error, Result};
