//! Dialog snippet schema

use krondor_core::{create_choice, Choice, DialogAction, DialogChoice, DialogSnippet, Target};
use serde::{Deserialize, Serialize};

/// A choice as written in a script
///
/// `Raw` takes the three words stored in the game's dialog files and
/// decodes them; `Decoded` names the choice directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceSpec {
    Raw {
        state: u16,
        #[serde(default)]
        choice0: u16,
        #[serde(default)]
        choice1: u16,
    },
    Decoded(Choice),
}

impl ChoiceSpec {
    pub fn to_choice(&self) -> Choice {
        match self {
            ChoiceSpec::Raw {
                state,
                choice0,
                choice1,
            } => create_choice(*state, *choice0, *choice1),
            ChoiceSpec::Decoded(choice) => *choice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDef {
    pub choice: ChoiceSpec,
    pub target: Target,
}

/// Definition of one dialog snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetDef {
    pub target: Target,
    #[serde(default)]
    pub actions: Vec<DialogAction>,
    #[serde(default)]
    pub choices: Vec<ChoiceDef>,
}

impl SnippetDef {
    pub fn into_snippet(self) -> (Target, DialogSnippet) {
        let choices = self
            .choices
            .iter()
            .map(|c| DialogChoice {
                choice: c.choice.to_choice(),
                target: c.target,
            })
            .collect();
        (
            self.target,
            DialogSnippet {
                actions: self.actions,
                choices,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krondor_core::ActiveStateFlag;

    #[test]
    fn test_snippet_def_ron() {
        let ron_str = r#"
        (
            target: 0x1c,
            actions: [
                SetFlag((event_pointer: 0x1b58, event_value: 1)),
                PushNextDialog(target: 0x1d),
            ],
            choices: [
                (choice: Raw(state: 0x7537, choice0: 2, choice1: 0xffff), target: 0x1d),
                (choice: Decoded(NoChoice), target: 0x1e),
            ],
        )
        "#;

        let def: SnippetDef = ron::from_str(ron_str).unwrap();
        let (target, snippet) = def.into_snippet();
        assert_eq!(target, Target(0x1c));
        assert_eq!(snippet.actions.len(), 2);
        assert_eq!(
            snippet.choices[0].choice,
            Choice::GameState {
                state: ActiveStateFlag::Chapter,
                min: 2,
                max: 0xffff,
            }
        );
        assert_eq!(snippet.choices[1].choice, Choice::NoChoice);
    }
}
