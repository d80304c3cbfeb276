use serde::Serialize;
use std::fmt;

/// Prompt template a rendering collaborator should apply to a task.
///
/// This crate only selects templates; rendering happens elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateId {
    /// SST-2.
    Sst2,
    /// SST-5.
    Sst5,
    /// SNLI.
    Snli,
    /// TREC.
    Trec,
    /// MNLI.
    Mnli,
    /// COPA.
    Copa,
    /// BoolQ, version 0.
    BoolQ,
    /// BoolQ, version 1.
    BoolQV2,
    /// BoolQ, version 2 (default).
    BoolQV3,
    /// MultiRC.
    MultiRc,
    /// CB.
    Cb,
    /// WIC.
    Wic,
    /// WSC.
    Wsc,
    /// ReCoRD in the GPT-3 cloze format.
    ReCoRDGpt3,
    /// RTE.
    Rte,
    /// SQuAD.
    SquadV2,
    /// DROP.
    Drop,
}

impl TemplateId {
    /// Name the rendering side registers this template under.
    pub fn name(self) -> &'static str {
        match self {
            TemplateId::Sst2 => "SST2Template",
            TemplateId::Sst5 => "SST5Template",
            TemplateId::Snli => "SNLITemplate",
            TemplateId::Trec => "TRECTemplate",
            TemplateId::Mnli => "MNLITemplate",
            TemplateId::Copa => "CopaTemplate",
            TemplateId::BoolQ => "BoolQTemplate",
            TemplateId::BoolQV2 => "BoolQTemplateV2",
            TemplateId::BoolQV3 => "BoolQTemplateV3",
            TemplateId::MultiRc => "MultiRCTemplate",
            TemplateId::Cb => "CBTemplate",
            TemplateId::Wic => "WICTemplate",
            TemplateId::Wsc => "WSCTemplate",
            TemplateId::ReCoRDGpt3 => "ReCoRDTemplateGPT3",
            TemplateId::Rte => "RTETemplate",
            TemplateId::SquadV2 => "SQuADv2Template",
            TemplateId::Drop => "DROPTemplate",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
