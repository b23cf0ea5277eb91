//! Typed lookups shared by [`Request`](crate::types::Request),
//! [`Response`](crate::types::Response) and [`Message`](crate::types::Message).
//!
//! Storage keeps headers in wire order; these accessors group them by type.
//! Singleton accessors return the first occurrence, which is the one a
//! receiver acts on when a duplicate was flagged during assembly.

use crate::types::call_id::CallId;
use crate::types::contact::Contact;
use crate::types::cseq::CSeq;
use crate::types::from::From as FromHeader;
use crate::types::headers::header_name::HeaderName;
use crate::types::headers::typed_header::TypedHeader;
use crate::types::media_type::ContentType;
use crate::types::scalar::{ContentLength, Expires, MaxForwards};
use crate::types::to::To;
use crate::types::via::{Via, ViaEntry};

pub trait HeaderAccess {
    /// All headers in the order they appear on the wire
    fn headers(&self) -> &[TypedHeader];

    /// First header with the given name
    fn header(&self, name: &HeaderName) -> Option<&TypedHeader> {
        self.headers().iter().find(|h| &h.name() == name)
    }

    /// Every header with the given name, in order
    fn headers_named<'a>(&'a self, name: &'a HeaderName) -> Box<dyn Iterator<Item = &'a TypedHeader> + 'a> {
        Box::new(self.headers().iter().filter(move |h| &h.name() == name))
    }

    fn has_header(&self, name: &HeaderName) -> bool {
        self.header(name).is_some()
    }

    /// Via header lines, topmost first
    fn via_headers(&self) -> Vec<&Via> {
        self.headers()
            .iter()
            .filter_map(|h| match h {
                TypedHeader::Via(via) => Some(via),
                _ => None,
            })
            .collect()
    }

    /// Topmost Via entry
    fn top_via(&self) -> Option<&ViaEntry> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::Via(via) => via.top(),
            _ => None,
        })
    }

    fn from_header(&self) -> Option<&FromHeader> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::From(from) => Some(from),
            _ => None,
        })
    }

    fn to_header(&self) -> Option<&To> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::To(to) => Some(to),
            _ => None,
        })
    }

    fn cseq(&self) -> Option<&CSeq> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::CSeq(cseq) => Some(cseq),
            _ => None,
        })
    }

    fn call_id(&self) -> Option<&CallId> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::CallId(id) => Some(id),
            _ => None,
        })
    }

    /// Contact header lines in order
    fn contacts(&self) -> Vec<&Contact> {
        self.headers()
            .iter()
            .filter_map(|h| match h {
                TypedHeader::Contact(contact) => Some(contact),
                _ => None,
            })
            .collect()
    }

    fn content_type(&self) -> Option<&ContentType> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::ContentType(ct) => Some(ct),
            _ => None,
        })
    }

    fn content_length(&self) -> Option<&ContentLength> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::ContentLength(cl) => Some(cl),
            _ => None,
        })
    }

    fn max_forwards(&self) -> Option<&MaxForwards> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::MaxForwards(mf) => Some(mf),
            _ => None,
        })
    }

    fn expires(&self) -> Option<&Expires> {
        self.headers().iter().find_map(|h| match h {
            TypedHeader::Expires(e) => Some(e),
            _ => None,
        })
    }
}
