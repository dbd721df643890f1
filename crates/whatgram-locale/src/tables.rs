//! UI string tables. Only Turkish and English are translated.

pub(crate) const TR: &[(&str, &str)] = &[
    // App
    ("appName", "WhatGram"),
    ("appSubtitle", "WhatsApp, Telegram ve WhatGram'ı birleştiren platform"),
    ("getStarted", "Telefon ile Giriş Yap"),
    // Auth
    ("phoneAuth", "Telefon numaranızla giriş yapın"),
    ("phoneNumber", "Telefon Numarası"),
    ("phoneHint", "Ülke kodu ile birlikte telefon numaranızı girin"),
    ("sendCode", "Doğrulama Kodu Gönder"),
    ("sendingCode", "Kod Gönderiliyor..."),
    ("verificationCode", "6 haneli kod"),
    ("verify", "Doğrula ve Giriş Yap"),
    ("verifying", "Doğrulanıyor..."),
    ("changePhone", "← Telefon numarasını değiştir"),
    ("resendCode", "Kodu tekrar gönder"),
    ("codeExpires", "Kod {minutes}:{seconds} dakika geçerli"),
    ("codeSent", "Doğrulama kodu gönderildi! Demo için: 123456"),
    ("sendingFailed", "Kod gönderilemedi"),
    ("verificationFailed", "Doğrulama başarısız"),
    ("sessionExpired", "Oturumunuz sona erdi, lütfen tekrar giriş yapın"),
    // Demo
    ("demoAccount", "Demo Hesap:"),
    // Main
    ("logout", "Çıkış"),
    ("contacts", "Kişiler"),
    ("groups", "Gruplar"),
    ("channels", "Kanallar"),
    // Platform
    ("whatsapp", "WhatsApp"),
    ("telegram", "Telegram"),
    ("whatgram", "WhatGram"),
    ("connect", "Bağlan"),
    ("connected", "Bağlı"),
    ("platformConnected", "{platform} bağlantısı başarılı!"),
    // Chat
    ("online", "Çevrimiçi"),
    ("lastSeen", "Son görülme: az önce"),
    ("encrypted", "E2E Şifreli"),
    ("unlimited", "Sınırsız Dosya"),
    ("platform", "Platform"),
    ("fastSharing", "Hızlı Dosya Paylaşımı"),
    ("connectionLost", "Canlı bağlantı kesildi"),
    // Messaging
    ("messageInputPlaceholder", "{type}'a mesaj yazın..."),
    ("dragDrop", "Dosya sürükleyip bırakın veya 📎 butonuna tıklayarak dosya seçin"),
    ("unlimitedFiles", "Sınırsız dosya boyutu desteklenir"),
    ("selectFiles", "Seçilen Dosyalar:"),
    ("uploadFiles", "Dosyaları Gönder"),
    ("uploading", "Yükleniyor..."),
    ("uploadFailed", "Dosya yükleme başarısız"),
    ("cancel", "İptal"),
    // Groups & channels
    ("createGroup", "Yeni Grup Oluştur"),
    ("createChannel", "Yeni Kanal Oluştur"),
    ("groupName", "Grup adı"),
    ("channelName", "Kanal adı"),
    ("description", "Açıklama (isteğe bağlı)"),
    ("memberPhones", "Üye telefon numaraları (virgülle ayrılı)"),
    ("publicGroup", "Herkese açık grup"),
    ("publicChannel", "Herkese açık kanal"),
    ("subscribersCanMessage", "Abone olanlar mesaj gönderebilir"),
    ("creating", "Oluşturuluyor..."),
    ("members", "üye"),
    ("subscribers", "abone"),
    ("groupCreated", "Grup başarıyla oluşturuldu!"),
    ("groupCreateFailed", "Grup oluşturma başarısız"),
    ("channelCreated", "Kanal başarıyla oluşturuldu!"),
    ("channelCreateFailed", "Kanal oluşturma başarısız"),
    // Welcome
    ("welcomeTitle", "WhatGram'a Hoş Geldiniz"),
    ("selectContact", "Bir kişi seçerek mesajlaşmaya başlayın"),
    ("selectGroup", "Bir grup seçin veya yeni grup oluşturun"),
    ("selectChannel", "Bir kanal seçin veya yeni kanal oluşturun"),
    ("classicMessaging", "Klasik mesajlaşma"),
    ("advancedFeatures", "Gelişmiş özellikler"),
    ("unlimitedE2E", "Sınırsız dosya & E2E şifreleme"),
    // Language settings
    ("languageSettings", "Dil Ayarları"),
    ("interfaceLanguage", "Arayüz Dili"),
    ("preferredLanguage", "Tercih Edilen Dil"),
    ("autoTranslate", "Otomatik Çeviri"),
    ("translationEnabled", "Mesajları otomatik olarak çevir"),
    ("save", "Kaydet"),
    ("languageSettingsSaved", "Dil ayarları güncellendi!"),
    ("languageSettingsFailed", "Dil ayarları güncellenirken hata oluştu!"),
    // Translation
    ("translateTo", "Şuna çevir:"),
    ("translating", "Çeviriliyor..."),
    ("translated", "Çevrildi"),
    ("originalLanguage", "Orijinal Dil"),
    ("showOriginal", "Orijinalini Göster"),
    ("showTranslation", "Çeviriyi Göster"),
];

pub(crate) const EN: &[(&str, &str)] = &[
    // App
    ("appName", "WhatGram"),
    ("appSubtitle", "Platform that unifies WhatsApp, Telegram and WhatGram"),
    ("getStarted", "Login with Phone"),
    // Auth
    ("phoneAuth", "Login with your phone number"),
    ("phoneNumber", "Phone Number"),
    ("phoneHint", "Enter your phone number with country code"),
    ("sendCode", "Send Verification Code"),
    ("sendingCode", "Sending Code..."),
    ("verificationCode", "6-digit code"),
    ("verify", "Verify and Login"),
    ("verifying", "Verifying..."),
    ("changePhone", "← Change phone number"),
    ("resendCode", "Resend code"),
    ("codeExpires", "Code expires in {minutes}:{seconds} minutes"),
    ("codeSent", "Verification code sent! Demo code: 123456"),
    ("sendingFailed", "Could not send the code"),
    ("verificationFailed", "Verification failed"),
    ("sessionExpired", "Your session expired, please log in again"),
    // Demo
    ("demoAccount", "Demo Account:"),
    // Main
    ("logout", "Logout"),
    ("contacts", "Contacts"),
    ("groups", "Groups"),
    ("channels", "Channels"),
    // Platform
    ("whatsapp", "WhatsApp"),
    ("telegram", "Telegram"),
    ("whatgram", "WhatGram"),
    ("connect", "Connect"),
    ("connected", "Connected"),
    ("platformConnected", "{platform} connected successfully!"),
    // Chat
    ("online", "Online"),
    ("lastSeen", "Last seen: recently"),
    ("encrypted", "E2E Encrypted"),
    ("unlimited", "Unlimited Files"),
    ("platform", "Platform"),
    ("fastSharing", "Fast File Sharing"),
    ("connectionLost", "Live connection lost"),
    // Messaging
    ("messageInputPlaceholder", "Type a message to {type}..."),
    ("dragDrop", "Drag and drop files or click 📎 button to select files"),
    ("unlimitedFiles", "Unlimited file size supported"),
    ("selectFiles", "Selected Files:"),
    ("uploadFiles", "Send Files"),
    ("uploading", "Uploading..."),
    ("uploadFailed", "File upload failed"),
    ("cancel", "Cancel"),
    // Groups & channels
    ("createGroup", "Create New Group"),
    ("createChannel", "Create New Channel"),
    ("groupName", "Group name"),
    ("channelName", "Channel name"),
    ("description", "Description (optional)"),
    ("memberPhones", "Member phone numbers (comma separated)"),
    ("publicGroup", "Public group"),
    ("publicChannel", "Public channel"),
    ("subscribersCanMessage", "Subscribers can send messages"),
    ("creating", "Creating..."),
    ("members", "members"),
    ("subscribers", "subscribers"),
    ("groupCreated", "Group created successfully!"),
    ("groupCreateFailed", "Group creation failed"),
    ("channelCreated", "Channel created successfully!"),
    ("channelCreateFailed", "Channel creation failed"),
    // Welcome
    ("welcomeTitle", "Welcome to WhatGram"),
    ("selectContact", "Select a contact to start messaging"),
    ("selectGroup", "Select a group or create a new group"),
    ("selectChannel", "Select a channel or create a new channel"),
    ("classicMessaging", "Classic messaging"),
    ("advancedFeatures", "Advanced features"),
    ("unlimitedE2E", "Unlimited files & E2E encryption"),
    // Language settings
    ("languageSettings", "Language Settings"),
    ("interfaceLanguage", "Interface Language"),
    ("preferredLanguage", "Preferred Language"),
    ("autoTranslate", "Auto Translate"),
    ("translationEnabled", "Automatically translate messages"),
    ("save", "Save"),
    ("languageSettingsSaved", "Language settings updated!"),
    ("languageSettingsFailed", "Failed to update language settings!"),
    // Translation
    ("translateTo", "Translate to:"),
    ("translating", "Translating..."),
    ("translated", "Translated"),
    ("originalLanguage", "Original Language"),
    ("showOriginal", "Show Original"),
    ("showTranslation", "Show Translation"),
];

/// Language code -> display name, in menu order.
pub(crate) const SUPPORTED: &[(&str, &str)] = &[
    ("tr", "Türkçe"),
    ("en", "English"),
    ("de", "Deutsch"),
    ("fr", "Français"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("ru", "Русский"),
    ("ar", "العربية"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文"),
    ("pt", "Português"),
];
