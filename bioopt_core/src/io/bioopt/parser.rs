//! Parser assembling a [`Model`] from the sections of a BioOpt document
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::io::bioopt::comments::CommentStripper;
use crate::io::bioopt::line_parser::{
    is_number, parse_constraint, parse_external_metabolite, parse_objective_line, parse_reaction,
    LineError,
};
use crate::io::bioopt::sections::{find_sections, Section, SectionKind};
use crate::io::bioopt::warning::{ParseWarning, WarningKind};
use crate::io::bioopt::{BiooptError, ParseReport, ParserOptions};
use crate::metabolic_model::expression::{MathExpression, Operation};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Direction, Reaction};

/// Position of a line within a document
#[derive(Debug, Clone, Copy)]
struct Position {
    section: SectionKind,
    line: usize,
    document_line: usize,
}

/// Comment free, non-empty line of a section
struct Line<'t> {
    content: String,
    raw: &'t str,
    position: Position,
}

/// BioOpt document parser
///
/// Sections are looked up independently of their order. Reactions are read first, then
/// constraints are applied to them by name, external metabolites are marked as boundary
/// and finally objective references are resolved. Problems which leave the document
/// readable are reported as [`ParseWarning`]s, syntax errors fail the whole document.
pub struct BiooptParser {
    options: ParserOptions,
    file: String,
    warnings: Vec<ParseWarning>,
    /// Names already checked for style problems, by kind
    checked_names: HashSet<(&'static str, String)>,
}

impl BiooptParser {
    pub fn new(options: ParserOptions) -> Self {
        let file = options
            .filename
            .clone()
            .unwrap_or_else(|| String::from("<string>"));
        BiooptParser {
            options,
            file,
            warnings: Vec::new(),
            checked_names: HashSet::new(),
        }
    }

    /// Parse a whole document
    pub fn parse(mut self, text: &str) -> Result<ParseReport, BiooptError> {
        let sections = self.select_sections(&find_sections(text))?;
        let lines = |kind: SectionKind| {
            sections
                .get(&kind)
                .map(|s| section_lines(s, kind))
                .unwrap_or_default()
        };

        let mut model = Model::new_empty();
        // First occurrence of every reaction name
        let mut reaction_index: HashMap<String, usize> = HashMap::new();
        for line in lines(SectionKind::Reactions) {
            let reaction = parse_reaction(&line.content).map_err(|e| syntax_error(&sections, &line, e))?;
            self.check_reaction_names(&reaction, line.position)?;
            if reaction_index.contains_key(reaction.name()) {
                self.warn(
                    Some(line.position),
                    WarningKind::DuplicateReaction(reaction.name().to_string()),
                )?;
            } else {
                reaction_index.insert(reaction.name().to_string(), model.reactions.len());
            }
            model.reactions.push(reaction);
        }

        let mut constraints = Vec::new();
        for line in lines(SectionKind::Constraints) {
            let stub = parse_constraint(&line.content, self.options.inf)
                .map_err(|e| syntax_error(&sections, &line, e))?;
            constraints.push((stub, line.position));
        }

        let mut external_metabolites = Vec::new();
        for line in lines(SectionKind::ExternalMetabolites) {
            let metabolite = parse_external_metabolite(&line.content)
                .map_err(|e| syntax_error(&sections, &line, e))?;
            external_metabolites.push((metabolite, line.position));
        }

        let mut objectives: IndexMap<SectionKind, Vec<(MathExpression, Position)>> = IndexMap::new();
        for kind in [SectionKind::Objective, SectionKind::DesignObjective] {
            let mut terms = Vec::new();
            for line in lines(kind) {
                let term = parse_objective_line(&line.content)
                    .map_err(|e| syntax_error(&sections, &line, e))?;
                terms.push((term, line.position));
            }
            objectives.insert(kind, terms);
        }

        model.unify_metabolite_references();

        for (stub, position) in constraints {
            let Some(&i) = reaction_index.get(stub.name()) else {
                self.warn(
                    Some(position),
                    WarningKind::UnknownConstraintReaction(stub.name().to_string()),
                )?;
                continue;
            };
            if model.reactions[i].direction == Direction::Forward && stub.bounds.lb() < 0. {
                self.warn(
                    Some(position),
                    WarningKind::DirectionConflict {
                        reaction: stub.name().to_string(),
                        lb: stub.bounds.lb(),
                    },
                )?;
            }
            model.reactions[i].bounds = stub.bounds;
        }

        for (metabolite, position) in external_metabolites {
            self.check_name("Metabolite", metabolite.name(), position)?;
            // Listing a metabolite twice is harmless
            if !model.set_boundary(metabolite.name(), true) {
                self.warn(
                    Some(position),
                    WarningKind::UnknownExternalMetabolite(metabolite.name().to_string()),
                )?;
            }
        }

        for (kind, terms) in objectives {
            for (term, position) in &terms {
                for reaction in term.reactions() {
                    if !reaction_index.contains_key(reaction.name()) {
                        self.warn(
                            Some(*position),
                            WarningKind::UnknownObjectiveReaction(reaction.name().to_string()),
                        )?;
                    }
                }
            }
            let expression = combine_terms(terms.into_iter().map(|(term, _)| term).collect())?;
            match kind {
                SectionKind::Objective => model.objective = expression,
                _ => model.design_objective = expression,
            }
        }
        model.unify_reaction_references();

        log::debug!(
            "Parsed {}: {} reactions, {} metabolites, {} warnings",
            self.file,
            model.reactions.len(),
            model.metabolites.len(),
            self.warnings.len()
        );
        Ok(ParseReport {
            model,
            warnings: self.warnings,
        })
    }

    /// First section of every kind, warning about missing and repeated sections
    fn select_sections<'t>(
        &mut self,
        sections: &[Section<'t>],
    ) -> Result<HashMap<SectionKind, Section<'t>>, BiooptError> {
        let mut selected = HashMap::new();
        for kind in SectionKind::ALL {
            let mut matching = sections.iter().filter(|s| kind.matches(s.header));
            match matching.next() {
                Some(first) => {
                    selected.insert(kind, first.clone());
                }
                None => self.warn(None, WarningKind::MissingSection(kind))?,
            }
            for repeated in matching {
                let header_line = repeated.first_line - 1;
                self.warn(
                    Some(Position {
                        section: kind,
                        line: 0,
                        document_line: header_line,
                    }),
                    WarningKind::DuplicateSection(repeated.header.to_string()),
                )?;
            }
        }
        Ok(selected)
    }

    fn check_reaction_names(&mut self, reaction: &Reaction, position: Position) -> Result<(), BiooptError> {
        self.check_name("Reaction", reaction.name(), position)?;
        for member in reaction.participants() {
            self.check_name("Metabolite", member.metabolite(), position)?;
        }
        Ok(())
    }

    /// Style warnings for names with whitespace and numeric names, once per name
    fn check_name(&mut self, kind: &'static str, name: &str, position: Position) -> Result<(), BiooptError> {
        if !self.checked_names.insert((kind, name.to_string())) {
            return Ok(());
        }
        if name.chars().any(char::is_whitespace) {
            self.warn(
                Some(position),
                WarningKind::NameContainsWhitespace {
                    kind,
                    name: name.to_string(),
                },
            )?;
        }
        if is_number(name) {
            self.warn(
                Some(position),
                WarningKind::NameIsNumber {
                    kind,
                    name: name.to_string(),
                },
            )?;
        }
        Ok(())
    }

    fn warn(&mut self, position: Option<Position>, kind: WarningKind) -> Result<(), BiooptError> {
        let warning = ParseWarning {
            file: self.file.clone(),
            section: position.map(|p| p.section),
            line: position.map(|p| p.line).filter(|&l| l > 0),
            document_line: position.map(|p| p.document_line),
            kind,
        };
        log::warn!("{}", warning);
        if self.options.strict {
            return Err(BiooptError::Warning(warning));
        }
        self.warnings.push(warning);
        Ok(())
    }
}

/// Non-empty lines of a section with comments removed
fn section_lines<'t>(section: &Section<'t>, kind: SectionKind) -> Vec<Line<'t>> {
    let mut stripper = CommentStripper::new();
    section
        .lines()
        .filter_map(|(line, raw)| {
            let content = stripper.strip(raw);
            if content.is_empty() {
                return None;
            }
            Some(Line {
                content,
                raw,
                position: Position {
                    section: kind,
                    line,
                    document_line: section.document_line(line),
                },
            })
        })
        .collect()
}

fn syntax_error(sections: &HashMap<SectionKind, Section>, line: &Line, source: LineError) -> BiooptError {
    let section = sections
        .get(&line.position.section)
        .map(|s| s.header.to_string())
        .unwrap_or_else(|| line.position.section.header().to_string());
    BiooptError::Syntax {
        section,
        line: line.position.line,
        document_line: line.position.document_line,
        content: line.raw.to_string(),
        source,
    }
}

/// Lines of an objective section are added up
fn combine_terms(mut terms: Vec<MathExpression>) -> Result<Option<MathExpression>, BiooptError> {
    Ok(match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => Some(MathExpression::new(
            Some(Operation::Addition),
            terms.into_iter().map(Into::into).collect(),
        )?),
    })
}
