use std::fmt::Display;

/// Static type of a variable or expression.
///
/// `Unknown` carries no information (undeclared names, relational results,
/// placeholders). `Error` marks an expression that already produced a type
/// error, so callers do not complain about it twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Soldier,
    Force,
    Intel,
    Flag,
    Unknown,
    Error,
}

impl Type {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "soldier" => Type::Soldier,
            "force" => Type::Force,
            "intel" => Type::Intel,
            "flag" => Type::Flag,
            _ => Type::Unknown,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Type::Soldier => "soldier",
            Type::Force => "force",
            Type::Intel => "intel",
            Type::Flag => "flag",
            Type::Unknown => "unknown",
            Type::Error => "error",
        }
    }

    fn primitive(&self) -> &'static str {
        match self {
            Type::Soldier => "int",
            Type::Force => "float",
            Type::Intel => "string",
            Type::Flag => "bool",
            Type::Unknown | Type::Error => "?",
        }
    }

    /// Result of `+`/`-`. String mixing is checked before boolean math.
    pub fn additive(left: Type, right: Type) -> Result<Type, &'static str> {
        if (left == Type::Intel) != (right == Type::Intel) {
            return Err("Cannot add String (intel) with Number");
        }
        if left == Type::Flag || right == Type::Flag {
            return Err("Cannot perform math on Boolean (flag)");
        }
        if left == Type::Intel {
            return Ok(Type::Intel);
        }
        Ok(Self::numeric(left, right))
    }

    /// Result of `*`/`/`. Strings are never allowed, not even two of them.
    pub fn multiplicative(left: Type, right: Type) -> Result<Type, &'static str> {
        if left == Type::Intel || right == Type::Intel {
            return Err("Cannot multiply/divide Strings");
        }
        if left == Type::Flag || right == Type::Flag {
            return Err("Cannot perform math on Boolean (flag)");
        }
        Ok(Self::numeric(left, right))
    }

    fn numeric(left: Type, right: Type) -> Type {
        if left == Type::Force || right == Type::Force {
            Type::Force
        } else {
            Type::Soldier
        }
    }

    /// Message for storing a `value` in a variable of type `self`, if rejected.
    ///
    /// Only int<-float, int<-string and string<-int are checked. Float to
    /// string and anything involving `flag` pass unchecked.
    pub fn assignment_mismatch(&self, value: Type) -> Option<String> {
        let rejected = matches!(
            (self, value),
            (Type::Soldier, Type::Force) | (Type::Soldier, Type::Intel) | (Type::Intel, Type::Soldier)
        );
        rejected.then(|| {
            format!(
                "Type Mismatch: Cannot assign '{value}' ({}) to '{self}' ({})",
                value.primitive(),
                self.primitive()
            )
        })
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
