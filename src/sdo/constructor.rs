//! `SDO_GEOMETRY(...)` constructor generation.

use core::fmt::Display;

use tracing::{debug, warn};

use super::clob::split_into_clobs;
use super::gtype::SdoGtype;
use crate::errors::Error;
use crate::options::CompilerOptions;
use crate::srid::SridResolver;
use crate::wkt::{EwktInfo, classify, parse_wkt};

/// Oracle collection type of an array argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdoArrayType {
    /// `SDO_ELEM_INFO_ARRAY`
    ElementInfo,
    /// `SDO_ORDINATE_ARRAY`
    Ordinate,
}

impl SdoArrayType {
    /// The Oracle type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SdoArrayType::ElementInfo => "SDO_ELEM_INFO_ARRAY",
            SdoArrayType::Ordinate => "SDO_ORDINATE_ARRAY",
        }
    }
}

/// How an array argument is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayEncoding {
    /// `SDO_ORDINATE_ARRAY(1,2,...)`
    Constructor,
    /// A subquery casting an `xmlsequence` of `<v>` nodes to the array type,
    /// which sidesteps the per-call argument limit.
    XmlSequence,
}

const XML_SEQUENCE_PREFIX: &str = "(select cast(multiset(select to_number(x.column_value.extract('v/text()'))c from table(xmlsequence(xmltype('<r>";
const XML_SEQUENCE_SUFFIX: &str = "</r>').extract('r/v')))x)as ";

/// Compiles classified literals into native `SDO_GEOMETRY` constructors.
#[derive(Debug, Clone, Default)]
pub struct SdoCompiler<R> {
    options: CompilerOptions,
    resolver: R,
}

impl<R: SridResolver> SdoCompiler<R> {
    /// Creates a compiler with the given limits and SRID resolver.
    #[must_use]
    pub fn new(options: CompilerOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    /// The limits in use.
    #[must_use]
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// The SRID resolver.
    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Which encoding an array of `len` values gets.
    #[must_use]
    pub fn array_encoding(&self, len: usize) -> ArrayEncoding {
        if len < self.options.array_limit {
            ArrayEncoding::Constructor
        } else {
            ArrayEncoding::XmlSequence
        }
    }

    /// Classify and compile a WKT/EWKT literal.
    ///
    /// # Errors
    ///
    /// See [`Self::compile`].
    pub fn compile_str(&self, input: &str) -> Result<String, Error> {
        let info = classify(input)?;
        self.compile(&info, None)
    }

    /// Compile a classified literal into `SDO_GEOMETRY(gtype,srid,NULL,elem_info,ordinates)`.
    ///
    /// `srid` overrides the SRID of the literal. An SRID the resolver does not
    /// know is written as `NULL`.
    ///
    /// # Errors
    ///
    /// Returns the parser's errors for a malformed body and
    /// [`Error::SridResolution`] when the SRID lookup fails. Nothing is
    /// emitted on error.
    pub fn compile(&self, info: &EwktInfo<'_>, srid: Option<u32>) -> Result<String, Error> {
        let arrays = parse_wkt(info.wkt_without_srid)?;
        let gtype = SdoGtype::from_info(info);
        let oracle_srid = match srid.or(info.srid) {
            Some(epsg) => {
                let resolved = self.resolver.resolve(epsg)?.filter(|srid| !srid.is_empty());
                if resolved.is_none() {
                    warn!(epsg, "no Oracle SRID for EPSG code, writing NULL");
                }
                resolved
            }
            None => None,
        };

        let element_info = arrays.element_info_values();
        debug!(
            gtype = gtype.code(),
            element_info = element_info.len(),
            ordinates = arrays.ordinates.len(),
            element_info_encoding = ?self.array_encoding(element_info.len()),
            ordinate_encoding = ?self.array_encoding(arrays.ordinates.len()),
            "compiling SDO_GEOMETRY constructor"
        );

        let mut sql = String::with_capacity(64 + 8 * (element_info.len() + arrays.ordinates.len()));
        sql.push_str("SDO_GEOMETRY(");
        sql.push_str(&gtype.to_string());
        sql.push(',');
        sql.push_str(oracle_srid.as_deref().unwrap_or("NULL"));
        sql.push_str(",NULL,");
        self.write_sdo_array(&element_info, SdoArrayType::ElementInfo, &mut sql);
        sql.push(',');
        self.write_sdo_array(&arrays.ordinates, SdoArrayType::Ordinate, &mut sql);
        sql.push(')');
        Ok(sql)
    }

    /// Write one array argument, choosing the encoding by its length.
    pub fn write_sdo_array<T: Display>(&self, values: &[T], array_type: SdoArrayType, out: &mut String) {
        match self.array_encoding(values.len()) {
            ArrayEncoding::Constructor => {
                out.push_str(array_type.as_str());
                out.push('(');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&value.to_string());
                }
                out.push(')');
            }
            ArrayEncoding::XmlSequence => {
                let mut xml = String::with_capacity(values.len() * 12);
                for value in values {
                    xml.push_str("<v>");
                    xml.push_str(&value.to_string());
                    xml.push_str("</v>");
                }
                out.push_str(XML_SEQUENCE_PREFIX);
                split_into_clobs(&xml, true, self.options.clob_limit, out);
                out.push_str(XML_SEQUENCE_SUFFIX);
                out.push_str(array_type.as_str());
                out.push_str(")from dual)");
            }
        }
    }
}
