use argh::FromArgs;

#[derive(FromArgs, Debug, Clone, PartialEq, Eq)]
/// A small interactive command interpreter.
pub struct Config {
    #[argh(option, default = "String::from(\"$ \")")]
    /// prompt printed before each new command line
    pub prompt: String,

    #[argh(option, default = "String::from(\". \")")]
    /// prompt printed while a quote or trailing backslash leaves the line incomplete
    pub continuation_prompt: String,

    #[argh(switch)]
    /// run `ls` after every successful `cd`
    pub list_after_cd: bool,

    #[argh(switch)]
    /// do not keep an in-memory history of entered lines
    pub no_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            continuation_prompt: ". ".to_string(),
            list_after_cd: false,
            no_history: false,
        }
    }
}
